//! # IR Link
//!
//! Link-layer protocol that keeps two pong devices in step over a half-duplex,
//! one-byte-at-a-time IR UART.
//!
//! ## Wire Format
//!
//! Every frame is a single byte, identified by its top nibble:
//! ```text
//! [seq:4][payload:4]   physics data, seq 0-7
//! [0xD:4][seq:4]       physics ack
//! 0xFA..=0xFF          control codes
//! ```
//!
//! ## Control Codes
//!
//! | Byte | Name | Meaning |
//! |------|------|---------|
//! | 0xFF | BLANK | idle line, never acted on |
//! | 0xFE | START | request to start a game |
//! | 0xFD | START_ACK | start accepted |
//! | 0xFC | END | round over |
//! | 0xFB | END_ACK | round end accepted |
//! | 0xFA | GAME_OVER | game over, repeated forever |
//!
//! A ball handoff is two data bytes: the even sequence number carries the row
//! position, the odd one carries the row direction (bit 3) and column speed
//! (bits 0-2).

mod error;
pub mod link;
pub mod serial;
pub mod sim;
pub mod socket;
pub mod transport;
pub mod wire;

pub use error::LinkError;
pub use link::{Event, Handoff, Link, Phase};
pub use serial::SerialTransport;
pub use sim::{FaultConfig, LossyTransport};
pub use socket::{SocketAddr, SocketListener, SocketTransport};
pub use transport::{QueueLink, QueueTransport, Transport};
pub use wire::{Control, SeqNum, WireByte};
