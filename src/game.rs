//! Game state, scoring and the per-tick drive of physics and link.

use crate::display::Frame;
use crate::physics::{Input, Physics};
use ir_link::{Event, Link};

/// Rightmost column of the score bar; scores grow leftwards
const SCORE_FIRST_COL: usize = 3;
const SCORE_ROW: usize = 5;
const SCORE_ROW_WIDE: usize = 4;
const OPPONENT_SCORE_ROW: usize = 1;
const OPPONENT_SCORE_ROW_WIDE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Between rounds, showing the score
    Start,
    Active,
    /// Someone reached the winning score
    End,
}

/// A line typed on stdin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Push,
    North,
    South,
    Forward,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Command> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "p" => Some(Command::Push),
            "n" => Some(Command::North),
            "s" => Some(Command::South),
            "w" => Some(Command::Forward),
            "q" => Some(Command::Quit),
            _ => None,
        }
    }

    pub fn input(self) -> Input {
        let mut input = Input::default();
        match self {
            Command::Push => input.push = true,
            Command::North => input.north = true,
            Command::South => input.south = true,
            Command::Forward => input.forward = true,
            Command::Quit => {}
        }
        input
    }
}

pub struct Game {
    state: GameState,
    physics: Physics,
    score: u8,
    opponent_score: u8,
    winning_score: u8,
}

impl Game {
    pub fn new(winning_score: u8) -> Self {
        Game {
            state: GameState::Start,
            physics: Physics::new(false),
            score: 0,
            opponent_score: 0,
            winning_score,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn opponent_score(&self) -> u8 {
        self.opponent_score
    }

    /// React to what the link reported this tick
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::None => {}
            Event::GameStarted { has_ball } => {
                self.state = GameState::Active;
                self.physics = Physics::new(has_ball);
            }
            Event::BallHandoff(handoff) => self.physics.receive(handoff),
            Event::RoundEnded => {
                self.physics.round_lost = true;
                self.score += 1;
                self.state = GameState::Start;
            }
            Event::GameEnded => {
                // GAME_OVER keeps arriving until the link is torn down
                if self.score != self.winning_score && self.opponent_score != self.winning_score {
                    self.score += 1;
                }
                self.state = GameState::End;
            }
        }
    }

    /// One game tick: apply the link event, run physics, and ask the link to
    /// end the round or hand the ball over when needed.
    pub fn advance(&mut self, event: Event, link: &mut Link, input: Input) -> Frame {
        self.apply(event);

        let mut frame = Frame::default();
        match self.state {
            GameState::Start | GameState::End => self.draw_scores(&mut frame),
            GameState::Active => self.play(&mut frame, link, input),
        }
        frame
    }

    fn play(&mut self, frame: &mut Frame, link: &mut Link, input: Input) {
        self.physics.update(input);

        if self.physics.round_lost {
            self.state = GameState::Start;
            self.opponent_score += 1;
            if self.opponent_score >= self.winning_score {
                self.state = GameState::End;
                link.request_send_end_game();
            } else {
                link.request_send_end_round();
            }
        }

        let paddle_c = self.physics.paddle_c as usize;
        let paddle_r = self.physics.paddle_r as usize;
        frame.light(paddle_c, paddle_r);
        frame.light(paddle_c, paddle_r + 1);

        if self.physics.ball_active {
            let (col, row) = self.physics.ball_led();
            frame.light(col, row);
        } else {
            // Only the first call per handoff is taken
            let handoff = self.physics.outgoing();
            link.request_send_physics_info(
                handoff.row_pos,
                handoff.row_dir_positive,
                handoff.col_speed_mag,
            );
        }
    }

    fn draw_scores(&self, frame: &mut Frame) {
        let wide = self.state == GameState::End;
        for (score, row, wide_row) in [
            (self.score, SCORE_ROW, SCORE_ROW_WIDE),
            (self.opponent_score, OPPONENT_SCORE_ROW, OPPONENT_SCORE_ROW_WIDE),
        ] {
            let lit = usize::from(score).min(SCORE_FIRST_COL + 1);
            for col in (SCORE_FIRST_COL + 1 - lit..=SCORE_FIRST_COL).rev() {
                frame.light(col, row);
                if wide {
                    frame.light(col, wide_row);
                }
            }
        }
    }

    /// Ball position in LEDs, when it is on this half
    pub fn ball_led(&self) -> Option<(usize, usize)> {
        if self.state == GameState::Active && self.physics.ball_active {
            Some(self.physics.ball_led())
        } else {
            None
        }
    }
}
