//! Host-loop entry point
//!
//! The host decodes devices into [`Input`] values and hands each frame's
//! inputs to [`tick`], which applies them in order and then advances the
//! message timers.

use serde::{Deserialize, Serialize};

use super::firing::Direction;
use super::session::{Boundary, GameSession};

/// One discrete input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Input {
    /// Digit key 0-9 (top row or keypad)
    Digit(u8),
    Backspace,
    /// Fire
    Confirm,
    Navigate(Direction),
    /// The wave touched a wall or the floor
    BoundsReached(Boundary),
    /// An invader touched the ship
    PlayerCollision,
}

impl GameSession {
    /// Apply a single input
    pub fn handle(&mut self, input: Input) {
        match input {
            Input::Digit(digit) => self.on_digit(digit),
            Input::Backspace => self.on_backspace(),
            Input::Confirm => self.on_confirm(),
            Input::Navigate(direction) => self.on_navigate(direction),
            Input::BoundsReached(boundary) => self.on_bounds_reached(boundary),
            Input::PlayerCollision => self.on_player_collision(),
        }
    }
}

/// Apply a frame's inputs in order, then advance timers by `dt_ms`
pub fn tick(session: &mut GameSession, inputs: &[Input], dt_ms: u32) {
    for input in inputs {
        session.handle(*input);
    }
    session.advance_time(dt_ms);
}
