//! Transient on-screen messages
//!
//! Each channel shows at most one message. Showing a new message on a channel
//! replaces the old one and cancels its pending fade. Timed messages hold at
//! full opacity, then fade out and disappear. The laser beam has a slot of its
//! own with the same replace-cancels rule.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Display slot for a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// "Level N" banners and end-of-game text
    Level,
    /// Hint after a wrong answer
    Help,
    /// Power bonus after clearing a level
    Bonus,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Level, Channel::Help, Channel::Bonus];

    fn slot(self) -> usize {
        match self {
            Channel::Level => 0,
            Channel::Help => 1,
            Channel::Bonus => 2,
        }
    }
}

/// A message currently on a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    /// Full-opacity time; `None` keeps the message until replaced
    pub hold_ms: Option<u32>,
    /// Fade-out duration after the hold
    pub fade_ms: u32,
    elapsed_ms: u32,
}

impl Message {
    pub fn new(text: impl Into<String>, hold_ms: Option<u32>, fade_ms: u32) -> Self {
        Self {
            text: text.into(),
            hold_ms,
            fade_ms,
            elapsed_ms: 0,
        }
    }

    /// Opacity in 0..=1
    pub fn alpha(&self) -> f32 {
        let Some(hold) = self.hold_ms else {
            return 1.0;
        };
        if self.elapsed_ms < hold {
            return 1.0;
        }
        if self.fade_ms == 0 {
            return 0.0;
        }
        let faded = (self.elapsed_ms - hold) as f32 / self.fade_ms as f32;
        (1.0 - faded).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.hold_ms
            .is_some_and(|hold| self.elapsed_ms >= hold.saturating_add(self.fade_ms))
    }
}

/// Beam from the ship to the group it just destroyed. No fade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Laser {
    pub from: Vec2,
    pub to: Vec2,
    pub hold_ms: u32,
    elapsed_ms: u32,
}

impl Laser {
    pub fn new(from: Vec2, to: Vec2, hold_ms: u32) -> Self {
        Self {
            from,
            to,
            hold_ms,
            elapsed_ms: 0,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed_ms >= self.hold_ms
    }
}

/// Current message per channel, plus the laser
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageBoard {
    slots: [Option<Message>; 3],
    laser: Option<Laser>,
}

impl MessageBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `message` on `channel`, cancelling whatever was there
    pub fn show(&mut self, channel: Channel, message: Message) {
        self.slots[channel.slot()] = Some(message);
    }

    pub fn get(&self, channel: Channel) -> Option<&Message> {
        self.slots[channel.slot()].as_ref()
    }

    /// Draw `laser`, cutting off any beam still showing
    pub fn fire(&mut self, laser: Laser) {
        self.laser = Some(laser);
    }

    pub fn laser(&self) -> Option<&Laser> {
        self.laser.as_ref()
    }

    /// Messages still visible, with their channel
    pub fn visible(&self) -> impl Iterator<Item = (Channel, &Message)> {
        Channel::ALL
            .into_iter()
            .filter_map(|channel| self.get(channel).map(|message| (channel, message)))
    }

    /// Advance all timers by `dt_ms`, dropping expired messages
    pub fn advance(&mut self, dt_ms: u32) {
        for slot in &mut self.slots {
            if let Some(message) = slot {
                message.elapsed_ms = message.elapsed_ms.saturating_add(dt_ms);
                if message.is_expired() {
                    *slot = None;
                }
            }
        }
        if let Some(laser) = &mut self.laser {
            laser.elapsed_ms = laser.elapsed_ms.saturating_add(dt_ms);
            if laser.is_expired() {
                self.laser = None;
            }
        }
    }
}
