//! Fault injection for the IR channel.
//!
//! An IR link loses bytes whenever someone walks between the devices, and a
//! flaky receiver can deliver the same byte twice. [`LossyTransport`] wraps any
//! [`Transport`] and applies that fault model to outgoing bytes so the
//! recovery paths of the link can be exercised deterministically.

use crate::transport::Transport;
use crate::LinkError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fault model. Rates are probabilities and are clamped to `[0.0, 1.0]`.
#[derive(Debug, Clone)]
pub struct FaultConfig {
    /// Probability that a sent byte is silently dropped
    pub loss_rate: f64,
    /// Probability that a sent byte is delivered twice
    pub duplicate_rate: f64,
    /// RNG seed, so a failing run can be replayed
    pub seed: u64,
}

impl Default for FaultConfig {
    fn default() -> Self {
        // No faults by default
        Self {
            loss_rate: 0.0,
            duplicate_rate: 0.0,
            seed: 0,
        }
    }
}

/// Counters kept by a [`LossyTransport`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaultStats {
    pub sent: u64,
    pub dropped: u64,
    pub duplicated: u64,
}

/// A fault-injecting wrapper around another transport
pub struct LossyTransport<T> {
    inner: T,
    loss_rate: f64,
    duplicate_rate: f64,
    rng: StdRng,
    stats: FaultStats,
}

impl<T: Transport> LossyTransport<T> {
    pub fn new(inner: T, config: FaultConfig) -> Self {
        LossyTransport {
            inner,
            loss_rate: config.loss_rate.clamp(0.0, 1.0),
            duplicate_rate: config.duplicate_rate.clamp(0.0, 1.0),
            rng: StdRng::seed_from_u64(config.seed),
            stats: FaultStats::default(),
        }
    }

    pub fn stats(&self) -> FaultStats {
        self.stats
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Transport> Transport for LossyTransport<T> {
    fn byte_available(&mut self) -> bool {
        self.inner.byte_available()
    }

    fn ready_to_send(&mut self) -> bool {
        self.inner.ready_to_send()
    }

    fn receive_byte(&mut self) -> u8 {
        self.inner.receive_byte()
    }

    fn send_byte(&mut self, byte: u8) {
        self.stats.sent += 1;
        if self.rng.gen_bool(self.loss_rate) {
            self.stats.dropped += 1;
            return;
        }
        self.inner.send_byte(byte);
        if self.rng.gen_bool(self.duplicate_rate) {
            self.stats.duplicated += 1;
            self.inner.send_byte(byte);
        }
    }

    fn take_error(&mut self) -> Option<LinkError> {
        self.inner.take_error()
    }
}
