//! Game session
//!
//! Owns the current wave, the firing positions, score and power, and walks
//! the level table. All state changes happen in response to one input event
//! at a time; every event runs to completion before the next.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::firing::{Direction, FiringPositions, MatchResult, Redistribution};
use super::messages::{Channel, Laser, Message, MessageBoard};
use super::problems::ProblemCatalog;
use super::wave::{DifficultyLevel, GroupId, LEVELS, LevelSequence, Wave, WaveBuilder};
use crate::consts::POINTS_PER_MEMBER;
use crate::settings::{Settings, SettingsError};

/// Offset between the wave seed and the prompt-variant seed
const PROMPT_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

const DEFEAT_TEXT: &str = "Game Over\n\nTry again next time";
const VICTORY_TEXT: &str = "Congratulations!\n\nGAME OVER";

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// A wave is on screen and input is accepted
    Playing,
    /// The wave reached the player
    Defeated,
    /// Every level cleared
    Victorious,
}

/// Which edge of the playfield the wave hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boundary {
    /// Left or right wall: the wave turns and drops a row
    Side,
    /// The floor: the wave reached the player
    Floor,
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { display_level: u32, groups: usize },
    AnswerRejected { position: usize, group: GroupId },
    /// `target` is where the group stood, for aiming the laser
    GroupDefeated { position: usize, group: GroupId, points: u64, target: Vec2 },
    PositionsRedistributed { outcome: Redistribution },
    LevelCleared { display_level: u32, bonus: u64 },
    PowerDrained { power: u8 },
    ShipMoved { position: usize },
    /// A message was put on a channel (replacing what was there)
    Message { channel: Channel, text: String, hold_ms: Option<u32> },
    Victory { score: u64 },
    Defeat { score: u64 },
}

/// A running game
#[derive(Debug, Clone)]
pub struct GameSession {
    settings: Settings,
    builder: WaveBuilder,
    levels: LevelSequence,
    wave: Wave,
    positions: FiringPositions,
    messages: MessageBoard,
    score: u64,
    power: u8,
    phase: GamePhase,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Start a session at the first level. `settings` should already be valid.
    pub fn new(settings: Settings) -> Self {
        let catalog = ProblemCatalog::new();
        let mut session = Self {
            builder: WaveBuilder::new(&catalog, settings.seed),
            levels: LevelSequence::new(),
            wave: Wave::empty(LEVELS[0]),
            positions: FiringPositions::new(settings.seed ^ PROMPT_STREAM),
            messages: MessageBoard::new(),
            score: 0,
            power: settings.max_power,
            phase: GamePhase::Playing,
            events: Vec::new(),
            settings,
        };
        log::info!("Session starting with seed {}", session.settings.seed);
        session.advance_level();
        session
    }

    /// Validate `settings`, then start a session
    pub fn try_new(settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::new(settings))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn power(&self) -> u8 {
        self.power
    }

    pub fn max_power(&self) -> u8 {
        self.settings.max_power
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Level of the wave on screen
    pub fn level(&self) -> DifficultyLevel {
        self.wave.level
    }

    /// Levels not yet started
    pub fn levels_remaining(&self) -> usize {
        self.levels.remaining()
    }

    pub fn wave(&self) -> &Wave {
        &self.wave
    }

    pub fn positions(&self) -> &FiringPositions {
        &self.positions
    }

    pub fn messages(&self) -> &MessageBoard {
        &self.messages
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Input ===

    pub fn on_digit(&mut self, digit: u8) {
        if self.is_running() {
            self.positions.add_digit(self.positions.selected(), digit);
        }
    }

    pub fn on_backspace(&mut self) {
        if self.is_running() {
            self.positions.delete_digit(self.positions.selected());
        }
    }

    pub fn on_navigate(&mut self, direction: Direction) {
        if self.is_running() && self.positions.navigate(direction, &mut self.wave) {
            self.events.push(GameEvent::ShipMoved {
                position: self.positions.selected(),
            });
        }
    }

    /// Fire at the group bound to the ship's position
    pub fn on_confirm(&mut self) {
        if !self.is_running() {
            return;
        }
        let position = self.positions.selected();
        match self.positions.evaluate(position, &mut self.wave) {
            MatchResult::Ignored => {}
            MatchResult::Miss { group } => {
                log::debug!("Wrong answer at position {} for group {:?}", position, group);
                self.events.push(GameEvent::AnswerRejected { position, group });
                if let Some(hint) = self.wave.group(group).map(|g| g.problem.hint()) {
                    let hold = self.settings.hold_for(self.settings.help_ms);
                    self.show(Channel::Help, hint.to_string(), Some(hold));
                }
            }
            MatchResult::Hit {
                group,
                tier,
                target,
                redistribution,
            } => {
                let points = POINTS_PER_MEMBER * (u64::from(tier) + 1);
                self.score += points;
                self.events.push(GameEvent::GroupDefeated {
                    position,
                    group,
                    points,
                    target,
                });
                let from = self.settings.ship_origin(position);
                self.messages.fire(Laser::new(from, target, self.settings.laser_ms));
                self.events.push(GameEvent::PositionsRedistributed {
                    outcome: redistribution,
                });
                if redistribution == Redistribution::LevelComplete {
                    self.clear_level();
                }
            }
        }
    }

    /// The wave hit an edge of the playfield
    pub fn on_bounds_reached(&mut self, boundary: Boundary) {
        if !self.is_running() {
            return;
        }
        if self.power > 0 {
            self.power -= 1;
            log::debug!("Power drained to {}", self.power);
            self.events.push(GameEvent::PowerDrained { power: self.power });
        }
        self.wave.descend(self.settings.descent_step());
        if boundary == Boundary::Floor {
            self.defeat();
        }
    }

    /// An invader touched the ship
    pub fn on_player_collision(&mut self) {
        self.defeat();
    }

    /// Advance message timers
    pub fn advance_time(&mut self, dt_ms: u32) {
        self.messages.advance(dt_ms);
    }

    // === Level flow ===

    fn advance_level(&mut self) {
        match self.levels.next() {
            Some(level) => self.start_level(level),
            None => self.win(),
        }
    }

    fn start_level(&mut self, level: DifficultyLevel) {
        self.power = self.settings.max_power;
        self.wave = self.builder.build(level, &self.settings.wave_layout());
        let outcome = self.positions.place(&mut self.wave);

        self.events.push(GameEvent::LevelStarted {
            display_level: level.display_level,
            groups: self.wave.groups().len(),
        });
        let hold = self.settings.hold_for(self.settings.level_banner_ms);
        self.show(Channel::Level, format!("Level {}", level.display_level), Some(hold));

        if outcome == Redistribution::LevelComplete {
            log::warn!("Level {} started without groups", level.display_level);
            self.clear_level();
        }
    }

    fn clear_level(&mut self) {
        let bonus = u64::from(self.power).pow(2);
        if bonus > 0 {
            self.score += bonus;
            let hold = self.settings.hold_for(self.settings.bonus_ms);
            self.show(Channel::Bonus, format!("+{bonus}"), Some(hold));
        }
        let display_level = self.wave.level.display_level;
        log::info!("Level {} cleared, bonus {}, score {}", display_level, bonus, self.score);
        self.events.push(GameEvent::LevelCleared {
            display_level,
            bonus,
        });
        self.advance_level();
    }

    fn win(&mut self) {
        if !self.is_running() {
            return;
        }
        self.phase = GamePhase::Victorious;
        self.positions.disable_all(&mut self.wave);
        self.show(Channel::Level, VICTORY_TEXT.to_string(), None);
        log::info!("All levels cleared, final score {}", self.score);
        self.events.push(GameEvent::Victory { score: self.score });
    }

    fn defeat(&mut self) {
        if !self.is_running() {
            return;
        }
        self.phase = GamePhase::Defeated;
        self.positions.disable_all(&mut self.wave);
        self.show(Channel::Level, DEFEAT_TEXT.to_string(), None);
        log::info!(
            "Defeated at level {}, final score {}",
            self.wave.level.display_level,
            self.score
        );
        self.events.push(GameEvent::Defeat { score: self.score });
    }

    fn show(&mut self, channel: Channel, text: String, hold_ms: Option<u32>) {
        let message = Message::new(text.clone(), hold_ms, self.settings.fade_ms);
        self.messages.show(channel, message);
        self.events.push(GameEvent::Message {
            channel,
            text,
            hold_ms,
        });
    }

    /// Everything the presentation layer needs to draw a frame
    pub fn snapshot(&self) -> SessionSnapshot {
        let xs = self.settings.position_xs();
        let positions = self
            .positions
            .positions()
            .iter()
            .map(|p| PositionView {
                index: p.index,
                x: xs.get(p.index).copied().unwrap_or_default(),
                answer: p.answer(),
                group: p.group(),
                prompt: p.prompt().map(str::to_string),
                selected: p.is_selected(),
            })
            .collect::<Vec<_>>();

        let groups = self
            .wave
            .groups()
            .iter()
            .map(|g| GroupView {
                id: g.id,
                tier: g.tier,
                color: g.color,
                sprite: g.kind.name(),
                active: g.active,
                selected: g.selected,
                prompt: positions
                    .iter()
                    .find(|p| p.group == Some(g.id))
                    .and_then(|p| p.prompt.clone()),
                rule: g.problem.rule.name(),
                hint: g.problem.hint(),
                members: g.members.clone(),
            })
            .collect();

        let messages = self
            .messages
            .visible()
            .map(|(channel, message)| MessageView {
                channel,
                text: message.text.clone(),
                alpha: message.alpha(),
            })
            .collect();

        let laser = self.messages.laser().map(|laser| LaserView {
            from: laser.from,
            to: laser.to,
        });

        SessionSnapshot {
            phase: self.phase,
            display_level: self.wave.level.display_level,
            score: self.score,
            power: self.power,
            max_power: self.settings.max_power,
            selected_position: self.positions.selected(),
            positions,
            groups,
            messages,
            laser,
        }
    }
}

/// Firing position as drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionView {
    pub index: usize,
    pub x: f32,
    pub answer: u64,
    pub group: Option<GroupId>,
    pub prompt: Option<String>,
    pub selected: bool,
}

/// Group as drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    pub id: GroupId,
    pub tier: u8,
    pub color: u32,
    pub sprite: &'static str,
    pub active: bool,
    pub selected: bool,
    /// Prompt shown by the position bound to this group, if any
    pub prompt: Option<String>,
    pub rule: &'static str,
    pub hint: &'static str,
    pub members: Vec<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageView {
    pub channel: Channel,
    pub text: String,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaserView {
    pub from: Vec2,
    pub to: Vec2,
}

/// Read-only view of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: GamePhase,
    pub display_level: u32,
    pub score: u64,
    pub power: u8,
    pub max_power: u8,
    pub selected_position: usize,
    pub positions: Vec<PositionView>,
    pub groups: Vec<GroupView>,
    pub messages: Vec<MessageView>,
    /// Beam still on screen, if any
    pub laser: Option<LaserView>,
}
