//! The byte transport consumed by the link, plus an in-process queue pair.

use crate::wire::BLANK;
use crate::LinkError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Poll-driven, one-byte-at-a-time transport. None of these calls may block.
pub trait Transport {
    /// A received byte is waiting
    fn byte_available(&mut self) -> bool;

    /// The transmitter can take a byte right now
    fn ready_to_send(&mut self) -> bool;

    /// Take the waiting byte. Returns [`BLANK`] when nothing is waiting.
    fn receive_byte(&mut self) -> u8;

    fn send_byte(&mut self, byte: u8);

    /// First I/O failure seen since the last call, if any.
    ///
    /// Transports that can fail stop reporting readiness once they have failed.
    fn take_error(&mut self) -> Option<LinkError> {
        None
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn byte_available(&mut self) -> bool {
        (**self).byte_available()
    }

    fn ready_to_send(&mut self) -> bool {
        (**self).ready_to_send()
    }

    fn receive_byte(&mut self) -> u8 {
        (**self).receive_byte()
    }

    fn send_byte(&mut self, byte: u8) {
        (**self).send_byte(byte)
    }

    fn take_error(&mut self) -> Option<LinkError> {
        (**self).take_error()
    }
}

/// One direction of a [`QueueLink`]
#[derive(Clone)]
struct Channel {
    bytes: Arc<Mutex<VecDeque<u8>>>,
    /// Clear-to-send for the writer of this channel
    cts: Arc<Mutex<bool>>,
}

impl Channel {
    fn new() -> Self {
        Channel {
            bytes: Arc::new(Mutex::new(VecDeque::new())),
            cts: Arc::new(Mutex::new(true)),
        }
    }
}

/// In-process stand-in for the IR channel between two devices.
///
/// Bytes are delivered in order and never lost; tests interfere with them
/// through [`QueueTransport::discard_incoming`] and [`QueueTransport::inject`].
pub struct QueueLink;

impl QueueLink {
    /// Two transports wired back to back
    pub fn pair() -> (QueueTransport, QueueTransport) {
        let a_to_b = Channel::new();
        let b_to_a = Channel::new();
        (
            QueueTransport {
                tx: a_to_b.clone(),
                rx: b_to_a.clone(),
            },
            QueueTransport {
                tx: b_to_a,
                rx: a_to_b,
            },
        )
    }
}

/// One end of a [`QueueLink`]
#[derive(Clone)]
pub struct QueueTransport {
    tx: Channel,
    rx: Channel,
}

impl QueueTransport {
    /// Set whether this end's transmitter accepts bytes
    pub fn set_ready(&self, ready: bool) {
        if let Ok(mut cts) = self.tx.cts.lock() {
            *cts = ready;
        }
    }

    /// Queue a byte as though the peer had sent it
    pub fn inject(&self, byte: u8) {
        if let Ok(mut queue) = self.rx.bytes.lock() {
            queue.push_back(byte);
        }
    }

    /// Remove and return everything in flight towards this end
    pub fn discard_incoming(&self) -> Vec<u8> {
        if let Ok(mut queue) = self.rx.bytes.lock() {
            queue.drain(..).collect()
        } else {
            vec![]
        }
    }

    /// Copy of the bytes in flight towards this end
    pub fn incoming(&self) -> Vec<u8> {
        if let Ok(queue) = self.rx.bytes.lock() {
            queue.iter().copied().collect()
        } else {
            vec![]
        }
    }
}

impl Transport for QueueTransport {
    fn byte_available(&mut self) -> bool {
        if let Ok(queue) = self.rx.bytes.lock() {
            !queue.is_empty()
        } else {
            false
        }
    }

    fn ready_to_send(&mut self) -> bool {
        if let Ok(cts) = self.tx.cts.lock() {
            *cts
        } else {
            false
        }
    }

    fn receive_byte(&mut self) -> u8 {
        if let Ok(mut queue) = self.rx.bytes.lock() {
            queue.pop_front().unwrap_or(BLANK)
        } else {
            BLANK
        }
    }

    fn send_byte(&mut self, byte: u8) {
        if let Ok(mut queue) = self.tx.bytes.lock() {
            queue.push_back(byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_delivers_in_order() {
        let (mut a, mut b) = QueueLink::pair();
        a.send_byte(0x01);
        a.send_byte(0x02);
        assert!(b.byte_available());
        assert!(!a.byte_available());
        assert_eq!(b.receive_byte(), 0x01);
        assert_eq!(b.receive_byte(), 0x02);
        assert!(!b.byte_available());
        assert_eq!(b.receive_byte(), BLANK);
    }

    #[test]
    fn test_ready_is_per_end() {
        let (mut a, mut b) = QueueLink::pair();
        assert!(a.ready_to_send());
        a.set_ready(false);
        assert!(!a.ready_to_send());
        assert!(b.ready_to_send());
    }

    #[test]
    fn test_discard_and_inject() {
        let (mut a, mut b) = QueueLink::pair();
        a.send_byte(0xD0);
        assert_eq!(b.incoming(), vec![0xD0]);
        assert_eq!(b.discard_incoming(), vec![0xD0]);
        assert!(!b.byte_available());
        b.inject(0xFE);
        assert_eq!(b.receive_byte(), 0xFE);
        assert!(a.take_error().is_none());
    }
}
