//! Single-byte frame codes and encoding/decoding for the IR link.
//!
//! Nothing in here holds state: the link state machine decides what a decoded
//! byte means in its current phase.

/// Idle line value, also what a transport reports when it has nothing to give
pub const BLANK: u8 = 0xFF;

/// Physics acknowledgement prefix; the low nibble carries the sequence number
pub const ACK_PREFIX: u8 = 0xD0;

/// Sequence numbers wrap at this value so data prefixes stay in 0x0-0x7
pub const SEQ_LIMIT: u8 = 8;

/// Control code constants
mod code {
    pub const START: u8 = 0xFE;
    pub const START_ACK: u8 = 0xFD;
    pub const END: u8 = 0xFC;
    pub const END_ACK: u8 = 0xFB;
    pub const GAME_OVER: u8 = 0xFA;
}

const PREFIX_MASK: u8 = 0xF0;
const SUFFIX_MASK: u8 = 0x0F;
const THREE_MASK: u8 = 0x07;
const DIR_BIT: u8 = 0x08;

/// Position of a physics byte within the handoff stream, modulo 8.
///
/// Even values carry the row position, odd values carry direction and speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeqNum(u8);

impl SeqNum {
    pub const fn new(value: u8) -> Self {
        SeqNum(value % SEQ_LIMIT)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn next(self) -> Self {
        SeqNum((self.0 + 1) % SEQ_LIMIT)
    }

    pub fn prev(self) -> Self {
        SeqNum((self.0 + SEQ_LIMIT - 1) % SEQ_LIMIT)
    }

    pub fn is_even(self) -> bool {
        self.0 % 2 == 0
    }
}

impl std::fmt::Display for SeqNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reserved single-byte control codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Start,
    StartAck,
    End,
    EndAck,
    GameOver,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::Start,
        Control::StartAck,
        Control::End,
        Control::EndAck,
        Control::GameOver,
    ];

    /// The byte transmitted for this code
    pub fn byte(self) -> u8 {
        match self {
            Control::Start => code::START,
            Control::StartAck => code::START_ACK,
            Control::End => code::END,
            Control::EndAck => code::END_ACK,
            Control::GameOver => code::GAME_OVER,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            code::START => Some(Control::Start),
            code::START_ACK => Some(Control::StartAck),
            code::END => Some(Control::End),
            code::END_ACK => Some(Control::EndAck),
            code::GAME_OVER => Some(Control::GameOver),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Control::Start => "START",
            Control::StartAck => "START_ACK",
            Control::End => "END",
            Control::EndAck => "END_ACK",
            Control::GameOver => "GAME_OVER",
        }
    }
}

/// A received or transmitted byte, classified by its leading nibble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireByte {
    Control(Control),
    /// Physics data; `payload` is the low nibble
    Data { seq: SeqNum, payload: u8 },
    /// Physics acknowledgement
    Ack(SeqNum),
    /// Anything else, including the idle byte. Never an error.
    Unknown(u8),
}

impl WireByte {
    /// Byte value on the wire
    pub fn encode(self) -> u8 {
        match self {
            WireByte::Control(c) => c.byte(),
            WireByte::Data { seq, payload } => (seq.value() << 4) | (payload & SUFFIX_MASK),
            WireByte::Ack(seq) => ACK_PREFIX | seq.value(),
            WireByte::Unknown(b) => b,
        }
    }
}

impl std::fmt::Display for WireByte {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireByte::Control(c) => write!(f, "{}", c.name()),
            WireByte::Data { seq, payload } => write!(f, "DATA seq={} payload=0x{:X}", seq, payload),
            WireByte::Ack(seq) => write!(f, "ACK seq={}", seq),
            WireByte::Unknown(b) => write!(f, "UNKNOWN 0x{:02X}", b),
        }
    }
}

/// Classify a raw byte
pub fn decode(byte: u8) -> WireByte {
    if let Some(c) = Control::from_byte(byte) {
        return WireByte::Control(c);
    }
    let prefix = (byte & PREFIX_MASK) >> 4;
    let suffix = byte & SUFFIX_MASK;
    if prefix < SEQ_LIMIT {
        WireByte::Data {
            seq: SeqNum(prefix),
            payload: suffix,
        }
    } else if byte & PREFIX_MASK == ACK_PREFIX && suffix < SEQ_LIMIT {
        WireByte::Ack(SeqNum(suffix))
    } else {
        WireByte::Unknown(byte)
    }
}

/// First handoff byte: row position in the low three bits
pub fn encode_row(seq: SeqNum, row_pos: u8) -> u8 {
    WireByte::Data {
        seq,
        payload: row_pos & THREE_MASK,
    }
    .encode()
}

/// Second handoff byte: bit 3 set iff moving in the positive row direction,
/// bits 0-2 the column speed magnitude
pub fn encode_motion(seq: SeqNum, row_dir_positive: bool, col_speed_mag: u8) -> u8 {
    let dir = if row_dir_positive { DIR_BIT } else { 0x00 };
    WireByte::Data {
        seq,
        payload: dir | (col_speed_mag & THREE_MASK),
    }
    .encode()
}

/// Row position carried by a first handoff payload
pub fn decode_row(payload: u8) -> u8 {
    payload & THREE_MASK
}

/// `(row_dir_positive, col_speed_mag)` carried by a second handoff payload
pub fn decode_motion(payload: u8) -> (bool, u8) {
    (payload & DIR_BIT != 0, payload & THREE_MASK)
}

/// Acknowledgement for the given sequence number
pub fn ack(seq: SeqNum) -> u8 {
    WireByte::Ack(seq).encode()
}
