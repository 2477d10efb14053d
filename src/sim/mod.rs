//! Deterministic gameplay module
//!
//! All game rules live here. This module must stay pure and deterministic:
//! - Seeded RNG only
//! - One input event at a time, applied completely
//! - No rendering, audio or platform dependencies

pub mod deck;
pub mod firing;
pub mod messages;
pub mod problems;
pub mod sampler;
pub mod session;
pub mod tick;
pub mod wave;

pub use deck::{Cycle, Deck};
pub use firing::{Direction, FiringPosition, FiringPositions, MatchResult, Redistribution};
pub use messages::{Channel, Laser, Message, MessageBoard};
pub use problems::{FactorPairs, Problem, ProblemCatalog, Rule, classify, generate, make_groups};
pub use sampler::{gauss_random, sample_tier, skewed_normal};
pub use session::{Boundary, GameEvent, GamePhase, GameSession, SessionSnapshot};
pub use tick::{Input, tick};
pub use wave::{
    DifficultyLevel, Group, GroupId, LEVELS, LevelSequence, Line, SpriteKind, Wave, WaveBuilder,
    WaveLayout,
};
