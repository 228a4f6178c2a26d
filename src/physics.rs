//! Ball and paddle simulation for one device's half of the table.
//!
//! Positions are in subpixels, [`SUBPIXEL`] per LED. Rows run across the
//! matrix; columns run from the edge facing the other device (column 0) to
//! the paddle (column 4).

use ir_link::Handoff;

/// Subpixels per LED
pub const SUBPIXEL: i16 = 100;

const BALL_INIT_R: i16 = 300;
const BALL_INIT_C: i16 = 0;
const BALL_INIT_VEL: i8 = 5;
const BALL_MAX_VEL_C: i8 = 7;

const PADDLE_INIT_R: i8 = 2;
const PADDLE_COL: i8 = 4;
const PADDLE_FORWARD_COL: i8 = 3;
const PADDLE_FORWARD_TICKS: u8 = 8;
const PADDLE_MAX_R: i8 = 5;

const LEFT_EDGE: i16 = 50;
const RIGHT_EDGE: i16 = 650;
const BOTTOM_EDGE: i16 = 0;
const TOP_EDGE: i16 = 450;
const PADDLE_EDGE: i16 = 350;
const PADDLE_FORWARD_EDGE: i16 = 250;
/// Rows are mirrored when the ball crosses to the other device
const REVERSE_R: i16 = 699;

/// Local controls sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Input {
    pub push: bool,
    pub north: bool,
    pub south: bool,
    pub forward: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Physics {
    /// Ball is on this device's half
    pub ball_active: bool,
    /// Ball went past the paddle
    pub round_lost: bool,
    pub ball_pos_r: i16,
    pub ball_pos_c: i16,
    pub ball_vel_r: i8,
    pub ball_vel_c: i8,
    pub paddle_r: i8,
    pub paddle_c: i8,
    /// Ticks left with the paddle pushed forward
    forward_ticks: u8,
    /// Column the paddle hits from; reset after one forward hit
    hit_col: i8,
}

impl Physics {
    pub fn new(ball_active: bool) -> Self {
        Physics {
            ball_active,
            round_lost: false,
            ball_pos_r: BALL_INIT_R,
            ball_pos_c: BALL_INIT_C,
            ball_vel_r: BALL_INIT_VEL,
            ball_vel_c: BALL_INIT_VEL,
            paddle_r: PADDLE_INIT_R,
            paddle_c: PADDLE_COL,
            forward_ticks: 0,
            hit_col: PADDLE_COL,
        }
    }

    /// Advance one tick: move the paddle, then the ball, handling collisions
    pub fn update(&mut self, input: Input) {
        if input.south {
            self.paddle_r += 1;
        } else if input.north {
            self.paddle_r -= 1;
        }

        if input.forward || self.forward_ticks > 0 {
            self.paddle_c = PADDLE_FORWARD_COL;
            if self.forward_ticks == 0 {
                self.forward_ticks = PADDLE_FORWARD_TICKS;
                self.hit_col = PADDLE_FORWARD_COL;
            }
            self.forward_ticks -= 1;
        } else {
            self.paddle_c = PADDLE_COL;
            self.hit_col = PADDLE_COL;
        }
        self.paddle_r = self.paddle_r.clamp(0, PADDLE_MAX_R);

        if !self.ball_active {
            return;
        }

        self.ball_pos_r += i16::from(self.ball_vel_r);
        self.ball_pos_c += i16::from(self.ball_vel_c);

        // Side walls
        if self.ball_pos_r < LEFT_EDGE {
            self.ball_pos_r = LEFT_EDGE + (LEFT_EDGE - self.ball_pos_r);
            self.ball_vel_r = -self.ball_vel_r;
        }
        if self.ball_pos_r >= RIGHT_EDGE {
            self.ball_pos_r = RIGHT_EDGE - 1 - (self.ball_pos_r - RIGHT_EDGE);
            self.ball_vel_r = -self.ball_vel_r;
        }

        // Crossing to the other device
        if self.ball_pos_c < BOTTOM_EDGE {
            self.ball_active = false;
            self.ball_pos_c = self.ball_pos_c.abs();
            self.ball_vel_c = self.ball_vel_c.abs();
            self.ball_pos_r = REVERSE_R - self.ball_pos_r;
            self.ball_vel_r = -self.ball_vel_r;
            return;
        }

        if self.ball_pos_c >= TOP_EDGE {
            self.round_lost = true;
            return;
        }

        if self.ball_pos_c >= PADDLE_EDGE && self.paddle_covers_ball() {
            self.ball_pos_c = PADDLE_EDGE - 1 - (self.ball_pos_c - PADDLE_EDGE);
            self.ball_vel_c = -self.ball_vel_c.abs();
        }
        if self.ball_pos_c >= PADDLE_FORWARD_EDGE
            && self.hit_col == PADDLE_FORWARD_COL
            && self.paddle_covers_ball()
        {
            self.ball_vel_c = (-self.ball_vel_c.abs() - 1).max(-BALL_MAX_VEL_C);
            self.hit_col = PADDLE_COL;
        }
    }

    fn paddle_covers_ball(&self) -> bool {
        let row = self.ball_pos_r / SUBPIXEL;
        row == i16::from(self.paddle_r) || row == i16::from(self.paddle_r) + 1
    }

    /// Ball state to send once it has left this half
    pub fn outgoing(&self) -> Handoff {
        Handoff::new(
            (self.ball_pos_r / SUBPIXEL) as u8,
            self.ball_vel_r >= 0,
            self.ball_vel_c.unsigned_abs(),
        )
    }

    /// Bring the ball in from the other device
    pub fn receive(&mut self, handoff: Handoff) {
        self.ball_active = true;
        self.ball_pos_r = i16::from(handoff.row_pos) * SUBPIXEL + SUBPIXEL / 2;
        self.ball_pos_c = 0;
        self.ball_vel_r = if handoff.row_dir_positive {
            self.ball_vel_r.abs()
        } else {
            -self.ball_vel_r.abs()
        };
        self.ball_vel_c = handoff.col_speed_mag as i8;
    }

    /// LED `(column, row)` the ball is in
    pub fn ball_led(&self) -> (usize, usize) {
        (
            (self.ball_pos_c / SUBPIXEL).max(0) as usize,
            (self.ball_pos_r / SUBPIXEL).max(0) as usize,
        )
    }
}
