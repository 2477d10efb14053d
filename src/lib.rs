//! Math Invaders - a multiplication-drill arcade game
//!
//! Waves of invader groups advance on the player, each group tagged with a
//! multiplication problem. The player stands at one of three firing positions,
//! types the product and fires; a correct answer destroys the group.
//!
//! Core modules:
//! - `sim`: Deterministic gameplay logic (problem catalog, wave building,
//!   firing positions, session orchestration)
//! - `settings`: Playfield geometry, timings and seed

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};
pub use sim::{GameEvent, GamePhase, GameSession, Input, tick};

/// Game configuration constants
pub mod consts {
    /// Number of difficulty tiers (0 = easiest, 4 = hardest)
    pub const TIER_COUNT: usize = 5;
    /// Largest factor in the problem set (problems cover 0..=12)
    pub const MAX_FACTOR: u8 = 12;
    /// Number of unique factor pairs `a <= b` in 0..=12
    pub const PAIR_COUNT: usize = 91;

    /// Firing positions along the bottom of the playfield
    pub const POSITION_COUNT: usize = 3;

    /// Spread used when sampling a group's tier around the level's center
    pub const TIER_SPREAD: u8 = 2;
    /// Base number of groups per wave (before stage/tier adjustments)
    pub const BASE_GROUP_COUNT: usize = 8;
    /// Gap between sprites and between groups, in unscaled pixels
    pub const GROUP_SPACING: f32 = 3.0;

    /// Points per member sprite of a defeated group
    pub const POINTS_PER_MEMBER: u64 = 10;

    /// Group colors by tier (green, cyan, yellow, orange, red)
    pub const TIER_COLORS: [u32; TIER_COUNT] = [0x00ff00, 0x00ffff, 0xffff00, 0xffa500, 0xff0000];
}
