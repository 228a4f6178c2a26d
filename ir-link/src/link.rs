//! The link state machine.
//!
//! [`Link`] is polled once per game tick. Each tick it latches at most one
//! received byte, decides whether this tick may transmit, runs the transition
//! for the current [`Phase`] and sends at most one byte. Transitions are plain
//! functions of the link context and a [`Tick`], so they can be driven without
//! any transport through [`Link::step`].
//!
//! There is no timeout anywhere: a phase that is waiting on the peer keeps
//! retransmitting for as long as it is polled.

use crate::transport::Transport;
use crate::wire::{self, Control, SeqNum, WireByte};

/// Protocol phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Idle between rounds; answers a peer START or a local push
    #[default]
    AwaitingPeerOrLocalStart,
    /// Repeating START until the peer acknowledges
    AnnouncingStart,
    /// Ball is on the peer's side; accepting its handoff bytes
    ReceivingHandoff,
    /// Ball is on this side
    HoldingBall,
    /// Repeating the current handoff byte until it is acknowledged
    SendingHandoff,
    /// Repeating END until the peer acknowledges
    EndingRound,
    /// Repeating GAME_OVER forever
    GameOver,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Ball state carried across the link when the ball changes sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Handoff {
    /// Row the ball crosses at, 0-7
    pub row_pos: u8,
    pub row_dir_positive: bool,
    /// Column speed magnitude, 0-7
    pub col_speed_mag: u8,
}

impl Handoff {
    /// Build a handoff, keeping only the three bits of each field that fit on the wire
    pub fn new(row_pos: u8, row_dir_positive: bool, col_speed_mag: u8) -> Self {
        Handoff {
            row_pos: row_pos & 0x07,
            row_dir_positive,
            col_speed_mag: col_speed_mag & 0x07,
        }
    }
}

/// What an update observed. At most one per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Event {
    #[default]
    None,
    GameStarted {
        has_ball: bool,
    },
    RoundEnded,
    GameEnded,
    BallHandoff(Handoff),
}

impl Event {
    pub fn is_none(&self) -> bool {
        matches!(self, Event::None)
    }
}

/// Inputs to one transition
#[derive(Debug, Clone, Copy, Default)]
pub struct Tick {
    /// Latched byte, if any
    pub rx: Option<u8>,
    /// This tick may transmit
    pub send_eligible: bool,
    /// Local start trigger fired this tick
    pub begin: bool,
}

/// Result of one transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: Phase,
    pub event: Event,
    /// Byte to transmit. Only ever set on a send-eligible tick.
    pub emit: Option<u8>,
    /// The latched byte has been used up and must be cleared
    pub consumed: bool,
}

impl Transition {
    fn to(next: Phase) -> Self {
        Transition {
            next,
            event: Event::None,
            emit: None,
            consumed: false,
        }
    }

    fn event(mut self, event: Event) -> Self {
        self.event = event;
        self
    }

    fn emit(mut self, byte: u8) -> Self {
        self.emit = Some(byte);
        self
    }

    fn consume(mut self) -> Self {
        self.consumed = true;
        self
    }
}

/// Link context for one device.
///
/// Owns everything that persists between ticks, so any number of links can
/// run side by side in one process.
#[derive(Debug, Clone, Default)]
pub struct Link {
    phase: Phase,
    seq: SeqNum,
    /// Handoff being sent, or being assembled from received bytes
    payload: Handoff,
    /// Most recent received byte not yet consumed
    latch: Option<u8>,
    /// Alternates every tick; 0 means this tick may transmit
    tick_parity: u8,
    begin: bool,
}

impl Link {
    pub fn new() -> Self {
        Link::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sequence(&self) -> SeqNum {
        self.seq
    }

    /// Latched byte waiting to be consumed
    pub fn latched(&self) -> Option<u8> {
        self.latch
    }

    /// Local start trigger. Honoured by the next update only, and only while
    /// awaiting a start.
    pub fn request_start(&mut self) {
        self.begin = true;
    }

    /// End the round from this side, whatever the link is doing
    pub fn request_send_end_round(&mut self) {
        self.phase = Phase::EndingRound;
    }

    /// End the game from this side, whatever the link is doing
    pub fn request_send_end_game(&mut self) {
        self.phase = Phase::GameOver;
    }

    /// Hand the ball to the peer. Ignored unless this side is holding the ball,
    /// so the driver may keep calling it until the handoff starts.
    pub fn request_send_physics_info(&mut self, row_pos: u8, row_dir_positive: bool, col_speed_mag: u8) {
        if self.phase != Phase::HoldingBall {
            return;
        }
        // A handoff always starts on an even number. Nudging an odd one back
        // into line is best effort; it cannot repair a peer that has diverged.
        if !self.seq.is_even() {
            self.seq = self.seq.next();
        }
        self.payload = Handoff::new(row_pos, row_dir_positive, col_speed_mag);
        self.phase = Phase::SendingHandoff;
    }

    /// Run one tick against the transport
    pub fn update<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Event {
        if transport.byte_available() {
            self.latch = Some(transport.receive_byte());
        }
        let send_eligible = self.send_window(transport);

        let tick = Tick {
            rx: self.latch,
            send_eligible,
            begin: std::mem::take(&mut self.begin),
        };
        let transition = self.step(tick);

        if transition.consumed {
            self.latch = None;
        }
        if let Some(byte) = transition.emit {
            transport.send_byte(byte);
        }
        self.phase = transition.next;
        transition.event
    }

    /// Every other tick may transmit. If the transmitter is busy on that tick
    /// the very next tick tries again.
    fn send_window<T: Transport + ?Sized>(&mut self, transport: &mut T) -> bool {
        self.tick_parity = (self.tick_parity + 1) % 2;
        if self.tick_parity != 0 {
            return false;
        }
        if transport.ready_to_send() {
            true
        } else {
            self.tick_parity = 1;
            false
        }
    }

    /// Compute the transition for the current phase. Updates the sequence
    /// number and handoff payload; phase and latch are left to the caller.
    pub fn step(&mut self, tick: Tick) -> Transition {
        let rx = tick.rx.map(wire::decode);
        let send = tick.send_eligible;
        match self.phase {
            Phase::AwaitingPeerOrLocalStart => self.awaiting_start(rx, send, tick.begin),
            Phase::AnnouncingStart => self.announcing_start(rx, send),
            Phase::ReceivingHandoff => self.receiving_handoff(rx, send),
            Phase::HoldingBall => self.holding_ball(rx, send),
            Phase::SendingHandoff => self.sending_handoff(rx, send),
            Phase::EndingRound => self.ending_round(rx, send),
            Phase::GameOver => self.game_over(send),
        }
    }

    fn awaiting_start(&mut self, rx: Option<WireByte>, send: bool, begin: bool) -> Transition {
        match rx {
            // Left latched: ReceivingHandoff answers it with START_ACK
            Some(WireByte::Control(Control::Start)) => Transition::to(Phase::ReceivingHandoff)
                .event(Event::GameStarted { has_ball: false }),
            // Peer is still finishing the previous round
            Some(WireByte::Control(Control::End)) if send => {
                Transition::to(Phase::AwaitingPeerOrLocalStart)
                    .emit(Control::EndAck.byte())
                    .consume()
            }
            _ if begin => Transition::to(Phase::AnnouncingStart),
            _ => Transition::to(Phase::AwaitingPeerOrLocalStart),
        }
    }

    fn announcing_start(&mut self, rx: Option<WireByte>, send: bool) -> Transition {
        match rx {
            // The side that asked first serves
            Some(WireByte::Control(Control::StartAck)) => Transition::to(Phase::HoldingBall)
                .event(Event::GameStarted { has_ball: true })
                .consume(),
            Some(WireByte::Control(Control::End)) if send => Transition::to(Phase::AnnouncingStart)
                .emit(Control::EndAck.byte())
                .consume(),
            // Both sides pushed at once: back off and let the peer's START win
            Some(WireByte::Control(Control::Start)) => {
                Transition::to(Phase::AwaitingPeerOrLocalStart).consume()
            }
            _ if send => Transition::to(Phase::AnnouncingStart).emit(Control::Start.byte()),
            _ => Transition::to(Phase::AnnouncingStart),
        }
    }

    fn receiving_handoff(&mut self, rx: Option<WireByte>, send: bool) -> Transition {
        let here = Phase::ReceivingHandoff;
        match rx {
            // Peer never saw our START_ACK
            Some(WireByte::Control(Control::Start)) if send => Transition::to(here)
                .emit(Control::StartAck.byte())
                .consume(),
            Some(WireByte::Control(Control::GameOver)) => Transition::to(Phase::GameOver)
                .event(Event::GameEnded)
                .consume(),
            Some(WireByte::Control(Control::End)) => Transition::to(Phase::AwaitingPeerOrLocalStart)
                .event(Event::RoundEnded)
                .consume(),
            Some(WireByte::Data { seq, payload }) if seq == self.seq => {
                // Applied even when we cannot ack yet; the byte stays latched
                // and is acked as the previous number on a later tick.
                let mut transition = Transition::to(here);
                if send {
                    transition = transition.emit(wire::ack(seq)).consume();
                }
                self.seq = seq.next();
                if seq.is_even() {
                    self.payload.row_pos = wire::decode_row(payload);
                    transition
                } else {
                    let (row_dir_positive, col_speed_mag) = wire::decode_motion(payload);
                    self.payload.row_dir_positive = row_dir_positive;
                    self.payload.col_speed_mag = col_speed_mag;
                    Transition {
                        next: Phase::HoldingBall,
                        event: Event::BallHandoff(self.payload),
                        ..transition
                    }
                }
            }
            // Our ack was lost and the peer is repeating itself
            Some(WireByte::Data { seq, .. }) if seq == self.seq.prev() && send => {
                Transition::to(here).emit(wire::ack(seq)).consume()
            }
            _ => Transition::to(here),
        }
    }

    fn holding_ball(&mut self, rx: Option<WireByte>, send: bool) -> Transition {
        match rx {
            // The ack that moved us here was lost
            Some(WireByte::Data { seq, .. }) if seq == self.seq.prev() && send => {
                Transition::to(Phase::HoldingBall).emit(wire::ack(seq)).consume()
            }
            _ => Transition::to(Phase::HoldingBall),
        }
    }

    fn sending_handoff(&mut self, rx: Option<WireByte>, send: bool) -> Transition {
        let mut transition = Transition::to(Phase::SendingHandoff);
        if rx == Some(WireByte::Ack(self.seq)) {
            let acked = self.seq;
            self.seq = acked.next();
            if !acked.is_even() {
                return Transition::to(Phase::ReceivingHandoff).consume();
            }
            transition = transition.consume();
        }
        if send {
            transition = transition.emit(self.handoff_byte());
        }
        transition
    }

    fn ending_round(&mut self, rx: Option<WireByte>, send: bool) -> Transition {
        match rx {
            Some(WireByte::Control(Control::EndAck)) => {
                Transition::to(Phase::AwaitingPeerOrLocalStart).consume()
            }
            _ if send => Transition::to(Phase::EndingRound).emit(Control::End.byte()),
            _ => Transition::to(Phase::EndingRound),
        }
    }

    fn game_over(&mut self, send: bool) -> Transition {
        let transition = Transition::to(Phase::GameOver);
        if send {
            transition.emit(Control::GameOver.byte())
        } else {
            transition
        }
    }

    /// Current outgoing handoff byte
    fn handoff_byte(&self) -> u8 {
        if self.seq.is_even() {
            wire::encode_row(self.seq, self.payload.row_pos)
        } else {
            wire::encode_motion(self.seq, self.payload.row_dir_positive, self.payload.col_speed_mag)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::QueueLink;

    fn link_in(phase: Phase, seq: u8) -> Link {
        Link {
            phase,
            seq: SeqNum::new(seq),
            ..Link::default()
        }
    }

    fn tick(rx: Option<u8>, send_eligible: bool) -> Tick {
        Tick {
            rx,
            send_eligible,
            begin: false,
        }
    }

    const START: u8 = 0xFE;
    const START_ACK: u8 = 0xFD;
    const END: u8 = 0xFC;
    const END_ACK: u8 = 0xFB;
    const GAME_OVER: u8 = 0xFA;

    #[test]
    fn test_initial_state() {
        let link = Link::new();
        assert_eq!(link.phase(), Phase::AwaitingPeerOrLocalStart);
        assert_eq!(link.sequence(), SeqNum::new(0));
        assert_eq!(link.latched(), None);
    }

    #[test]
    fn test_peer_start_is_left_latched_for_ack() {
        let mut link = Link::new();
        let t = link.step(tick(Some(START), true));
        assert_eq!(t.next, Phase::ReceivingHandoff);
        assert_eq!(t.event, Event::GameStarted { has_ball: false });
        assert_eq!(t.emit, None);
        assert!(!t.consumed);
    }

    #[test]
    fn test_awaiting_acks_leftover_end_only_when_eligible() {
        let mut link = Link::new();
        let t = link.step(tick(Some(END), false));
        assert_eq!(t.emit, None);
        assert!(!t.consumed);
        let t = link.step(tick(Some(END), true));
        assert_eq!(t.emit, Some(END_ACK));
        assert!(t.consumed);
        assert_eq!(t.next, Phase::AwaitingPeerOrLocalStart);
    }

    #[test]
    fn test_begin_trigger() {
        let mut link = Link::new();
        let t = link.step(Tick {
            rx: None,
            send_eligible: false,
            begin: true,
        });
        assert_eq!(t.next, Phase::AnnouncingStart);
        assert!(t.event.is_none());
    }

    #[test]
    fn test_begin_is_discarded_outside_awaiting() {
        let mut link = link_in(Phase::EndingRound, 0);
        let (mut a, _b) = QueueLink::pair();
        link.request_start();
        link.update(&mut a);
        link.phase = Phase::AwaitingPeerOrLocalStart;
        link.update(&mut a);
        assert_eq!(link.phase(), Phase::AwaitingPeerOrLocalStart);
    }

    #[test]
    fn test_announcing_repeats_start_on_eligible_ticks() {
        let mut link = link_in(Phase::AnnouncingStart, 0);
        assert_eq!(link.step(tick(None, false)).emit, None);
        assert_eq!(link.step(tick(None, true)).emit, Some(START));
        assert_eq!(link.step(tick(None, true)).emit, Some(START));
    }

    #[test]
    fn test_announcing_start_ack_gives_ball() {
        let mut link = link_in(Phase::AnnouncingStart, 0);
        let t = link.step(tick(Some(START_ACK), true));
        assert_eq!(t.next, Phase::HoldingBall);
        assert_eq!(t.event, Event::GameStarted { has_ball: true });
        assert!(t.consumed);
        assert_eq!(t.emit, None);
    }

    #[test]
    fn test_announcing_backs_off_on_simultaneous_start() {
        let mut link = link_in(Phase::AnnouncingStart, 0);
        let t = link.step(tick(Some(START), true));
        assert_eq!(t.next, Phase::AwaitingPeerOrLocalStart);
        assert!(t.consumed);
        assert_eq!(t.emit, None);
    }

    #[test]
    fn test_announcing_acks_end_instead_of_start() {
        let mut link = link_in(Phase::AnnouncingStart, 0);
        let t = link.step(tick(Some(END), true));
        assert_eq!(t.emit, Some(END_ACK));
        assert_eq!(t.next, Phase::AnnouncingStart);
        // Not eligible: END stays latched and nothing goes out
        let t = link.step(tick(Some(END), false));
        assert_eq!(t.emit, None);
        assert!(!t.consumed);
    }

    #[test]
    fn test_receiving_answers_repeated_start() {
        let mut link = link_in(Phase::ReceivingHandoff, 0);
        let t = link.step(tick(Some(START), true));
        assert_eq!(t.emit, Some(START_ACK));
        assert!(t.consumed);
        let t = link.step(tick(Some(START), false));
        assert_eq!(t.emit, None);
        assert!(!t.consumed);
        assert_eq!(t.next, Phase::ReceivingHandoff);
    }

    #[test]
    fn test_receiving_end_and_game_over() {
        let mut link = link_in(Phase::ReceivingHandoff, 4);
        let t = link.step(tick(Some(END), false));
        assert_eq!(t.next, Phase::AwaitingPeerOrLocalStart);
        assert_eq!(t.event, Event::RoundEnded);
        assert!(t.consumed);

        let mut link = link_in(Phase::ReceivingHandoff, 4);
        let t = link.step(tick(Some(GAME_OVER), false));
        assert_eq!(t.next, Phase::GameOver);
        assert_eq!(t.event, Event::GameEnded);
        assert!(t.consumed);
    }

    #[test]
    fn test_receiving_applies_byte_before_it_can_ack() {
        let mut link = link_in(Phase::ReceivingHandoff, 0);
        let t = link.step(tick(Some(0x03), false));
        assert_eq!(t.emit, None);
        assert!(!t.consumed);
        assert_eq!(link.sequence(), SeqNum::new(1));

        // Same byte, now one behind: acked without being applied again
        let t = link.step(tick(Some(0x03), true));
        assert_eq!(t.emit, Some(0xD0));
        assert!(t.consumed);
        assert_eq!(link.sequence(), SeqNum::new(1));
    }

    #[test]
    fn test_receiving_completes_handoff() {
        let mut link = link_in(Phase::ReceivingHandoff, 0);
        let t = link.step(tick(Some(0x03), true));
        assert_eq!(t.emit, Some(0xD0));
        assert!(t.event.is_none());
        let t = link.step(tick(Some(0x1D), true));
        assert_eq!(t.emit, Some(0xD1));
        assert_eq!(t.next, Phase::HoldingBall);
        assert_eq!(t.event, Event::BallHandoff(Handoff::new(3, true, 5)));
        assert_eq!(link.sequence(), SeqNum::new(2));
    }

    #[test]
    fn test_receiving_ignores_stale_and_foreign_bytes() {
        let mut link = link_in(Phase::ReceivingHandoff, 4);
        for byte in [0x23, 0x55, 0xD4, 0xA0, 0xFF, END_ACK] {
            let t = link.step(tick(Some(byte), true));
            assert_eq!(t, Transition::to(Phase::ReceivingHandoff), "byte 0x{:02X}", byte);
        }
        assert_eq!(link.sequence(), SeqNum::new(4));
    }

    #[test]
    fn test_sequence_wraps_mid_handoff() {
        let mut link = link_in(Phase::ReceivingHandoff, 6);
        link.step(tick(Some(0x62), true));
        let t = link.step(tick(Some(0x74), true));
        assert_eq!(t.emit, Some(0xD7));
        assert_eq!(t.event, Event::BallHandoff(Handoff::new(2, false, 4)));
        assert_eq!(link.sequence(), SeqNum::new(0));

        // 7 is now the previous number: acked again, not applied
        link.phase = Phase::ReceivingHandoff;
        let t = link.step(tick(Some(0x74), true));
        assert_eq!(t.emit, Some(0xD7));
        assert!(t.event.is_none());
        assert_eq!(link.sequence(), SeqNum::new(0));

        // 0 is new data
        let t = link.step(tick(Some(0x05), true));
        assert_eq!(t.emit, Some(0xD0));
        assert_eq!(link.sequence(), SeqNum::new(1));
    }

    #[test]
    fn test_holding_reacks_previous_only() {
        let mut link = link_in(Phase::HoldingBall, 2);
        let t = link.step(tick(Some(0x1D), true));
        assert_eq!(t.emit, Some(0xD1));
        assert!(t.consumed);
        let t = link.step(tick(Some(0x1D), false));
        assert_eq!(t.emit, None);
        let t = link.step(tick(Some(0x03), true));
        assert_eq!(t.emit, None);
        assert_eq!(t.next, Phase::HoldingBall);
    }

    #[test]
    fn test_physics_request_only_while_holding() {
        for phase in [
            Phase::AwaitingPeerOrLocalStart,
            Phase::AnnouncingStart,
            Phase::ReceivingHandoff,
            Phase::SendingHandoff,
            Phase::EndingRound,
            Phase::GameOver,
        ] {
            let mut link = link_in(phase, 0);
            link.request_send_physics_info(1, true, 1);
            assert_eq!(link.phase(), phase);
        }
        let mut link = link_in(Phase::HoldingBall, 0);
        link.request_send_physics_info(9, true, 15);
        assert_eq!(link.phase(), Phase::SendingHandoff);
        assert_eq!(link.payload, Handoff::new(1, true, 7));
    }

    #[test]
    fn test_physics_request_realigns_odd_sequence() {
        let mut link = link_in(Phase::HoldingBall, 3);
        link.request_send_physics_info(2, false, 3);
        assert_eq!(link.sequence(), SeqNum::new(4));
        assert_eq!(link.step(tick(None, true)).emit, Some(0x42));
    }

    #[test]
    fn test_sending_handoff() {
        let mut link = link_in(Phase::HoldingBall, 0);
        link.request_send_physics_info(3, true, 5);
        assert_eq!(link.step(tick(None, true)).emit, Some(0x03));
        assert_eq!(link.step(tick(None, false)).emit, None);
        // Wrong ack is ignored and the byte repeated
        let t = link.step(tick(Some(0xD1), true));
        assert_eq!(t.emit, Some(0x03));
        assert!(!t.consumed);
        // Right ack moves to the second byte in the same tick
        let t = link.step(tick(Some(0xD0), true));
        assert!(t.consumed);
        assert_eq!(t.emit, Some(0x1D));
        assert_eq!(t.next, Phase::SendingHandoff);
        link.phase = t.next;
        let t = link.step(tick(Some(0xD1), true));
        assert_eq!(t.next, Phase::ReceivingHandoff);
        assert_eq!(t.emit, None);
        assert!(t.consumed);
        assert_eq!(link.sequence(), SeqNum::new(2));
    }

    #[test]
    fn test_ending_round() {
        let mut link = link_in(Phase::HoldingBall, 2);
        link.request_send_end_round();
        assert_eq!(link.phase(), Phase::EndingRound);
        assert_eq!(link.step(tick(None, true)).emit, Some(END));
        assert_eq!(link.step(tick(None, false)).emit, None);
        let t = link.step(tick(Some(END_ACK), true));
        assert_eq!(t.next, Phase::AwaitingPeerOrLocalStart);
        assert!(t.consumed);
        assert_eq!(t.emit, None);
    }

    #[test]
    fn test_game_over_repeats_forever() {
        let mut link = link_in(Phase::SendingHandoff, 1);
        link.request_send_end_game();
        for rx in [None, Some(START), Some(END_ACK), Some(0xD1)] {
            let t = link.step(tick(rx, true));
            assert_eq!(t.next, Phase::GameOver);
            assert_eq!(t.emit, Some(GAME_OVER));
            assert!(t.event.is_none());
        }
    }

    #[test]
    fn test_update_alternates_send_ticks() {
        let (mut a, b) = QueueLink::pair();
        let mut link = link_in(Phase::GameOver, 0);
        for _ in 0..6 {
            link.update(&mut a);
        }
        assert_eq!(b.incoming(), vec![GAME_OVER; 3]);
    }

    #[test]
    fn test_update_retries_next_tick_when_busy() {
        let (mut a, b) = QueueLink::pair();
        let mut link = link_in(Phase::GameOver, 0);
        a.set_ready(false);
        link.update(&mut a);
        link.update(&mut a);
        assert!(b.incoming().is_empty());
        a.set_ready(true);
        link.update(&mut a);
        assert_eq!(b.discard_incoming(), vec![GAME_OVER]);
        link.update(&mut a);
        assert!(b.incoming().is_empty());
        link.update(&mut a);
        assert_eq!(b.incoming(), vec![GAME_OVER]);
    }

    #[test]
    fn test_update_latches_across_ticks() {
        let (mut a, b) = QueueLink::pair();
        let mut link = link_in(Phase::HoldingBall, 2);
        a.inject(0x1D);
        // Odd tick: cannot ack, byte stays latched
        link.update(&mut a);
        assert_eq!(link.latched(), Some(0x1D));
        link.update(&mut a);
        assert_eq!(link.latched(), None);
        assert_eq!(b.incoming(), vec![0xD1]);
    }

    #[test]
    fn test_newer_byte_overwrites_latch() {
        let (mut a, _b) = QueueLink::pair();
        let mut link = link_in(Phase::HoldingBall, 2);
        a.inject(0x55);
        link.update(&mut a);
        assert_eq!(link.latched(), Some(0x55));
        a.inject(0x66);
        link.update(&mut a);
        assert_eq!(link.latched(), Some(0x66));
    }
}
