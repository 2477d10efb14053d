//! Wave composition and placement
//!
//! A wave is the set of invader groups for one level. Each group gets a tier
//! sampled around the level's tier center and the next problem from that
//! tier's deck, then is laid out left to right, wrapping onto a new row when
//! it runs past the lane.

use std::iter::FusedIterator;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::deck::{Cycle, Deck};
use super::problems::{Problem, ProblemCatalog};
use super::sampler::sample_tier;
use crate::consts::*;

/// One entry of the level table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyLevel {
    /// Level number shown to the player
    pub display_level: u32,
    /// Tier the wave's problems cluster around (0..TIER_COUNT)
    pub tier_center: u8,
    /// Group count band (0..=2), more groups per step
    pub stage: u8,
}

impl DifficultyLevel {
    pub const fn new(display_level: u32, tier_center: u8, stage: u8) -> Self {
        Self {
            display_level,
            tier_center,
            stage,
        }
    }

    /// Groups in this level's wave: `8 + 2*stage - round(0.66*tier_center)`
    pub fn group_count(&self) -> usize {
        let bonus = 2 * usize::from(self.stage);
        let penalty = (0.66 * f64::from(self.tier_center)).round() as usize;
        (BASE_GROUP_COUNT + bonus).saturating_sub(penalty)
    }
}

/// The fixed level table, played once in order
pub const LEVELS: [DifficultyLevel; 15] = [
    DifficultyLevel::new(1, 0, 0),
    DifficultyLevel::new(2, 0, 1),
    DifficultyLevel::new(3, 1, 0),
    DifficultyLevel::new(4, 0, 2),
    DifficultyLevel::new(5, 1, 1),
    DifficultyLevel::new(6, 2, 0),
    DifficultyLevel::new(7, 1, 2),
    DifficultyLevel::new(8, 2, 1),
    DifficultyLevel::new(9, 3, 0),
    DifficultyLevel::new(10, 2, 2),
    DifficultyLevel::new(11, 3, 1),
    DifficultyLevel::new(12, 4, 0),
    DifficultyLevel::new(13, 3, 2),
    DifficultyLevel::new(14, 4, 1),
    DifficultyLevel::new(15, 4, 2),
];

/// Cursor over [`LEVELS`]. Once exhausted it stays exhausted.
#[derive(Debug, Clone, Default)]
pub struct LevelSequence {
    next: usize,
}

impl LevelSequence {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Entries already handed out
    pub fn consumed(&self) -> usize {
        self.next
    }

    pub fn remaining(&self) -> usize {
        LEVELS.len() - self.next
    }
}

impl Iterator for LevelSequence {
    type Item = DifficultyLevel;

    fn next(&mut self) -> Option<Self::Item> {
        let level = LEVELS.get(self.next).copied()?;
        self.next += 1;
        Some(level)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl FusedIterator for LevelSequence {}

/// Invader sprite kinds, handed out in rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    Crab,
    Mon,
    Sir,
}

impl SpriteKind {
    pub const ALL: [SpriteKind; 3] = [SpriteKind::Crab, SpriteKind::Mon, SpriteKind::Sir];

    /// Unscaled sprite width in pixels
    pub fn width(&self) -> f32 {
        match self {
            SpriteKind::Crab => 17.0,
            SpriteKind::Mon => 23.0,
            SpriteKind::Sir => 24.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpriteKind::Crab => "crab",
            SpriteKind::Mon => "mon",
            SpriteKind::Sir => "sir",
        }
    }
}

/// Unique identifier of a group within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(u32);

impl GroupId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// A cluster of invaders sharing one problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub tier: u8,
    pub problem: Problem,
    pub kind: SpriteKind,
    pub color: u32,
    /// Still waiting to be answered
    pub active: bool,
    /// Highlighted because the player's firing position targets it
    pub selected: bool,
    /// Row of the wave the group was placed on
    pub line: usize,
    /// Top-left corner of the group
    pub position: Vec2,
    /// Extent of the sprites
    pub width: f32,
    /// Width plus the trailing gap to the next group
    pub spaced_width: f32,
    /// Center of each member sprite (tier + 1 members)
    pub members: Vec<Vec2>,
}

impl Group {
    pub(crate) fn new(
        id: GroupId,
        problem: Problem,
        kind: SpriteKind,
        scale: f32,
        origin: Vec2,
        line: usize,
    ) -> Self {
        let tier = problem.tier;
        let count = usize::from(tier) + 1;
        let sprite = kind.width() * scale;
        let gap = GROUP_SPACING * scale;

        let members = (0..count)
            .map(|i| Vec2::new(origin.x + i as f32 * (sprite + gap) + sprite / 2.0, origin.y))
            .collect();
        let width = count as f32 * sprite + (count - 1) as f32 * gap;

        Self {
            id,
            tier,
            problem,
            kind,
            color: TIER_COLORS[usize::from(tier).min(TIER_COUNT - 1)],
            active: true,
            selected: false,
            line,
            position: origin,
            width,
            spaced_width: width + gap,
            members,
        }
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Point a laser aims at: horizontal middle of the group
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.position.x + self.width / 2.0, self.position.y)
    }

    pub fn select(&mut self) {
        self.selected = true;
    }

    pub fn deselect(&mut self) {
        self.selected = false;
    }

    /// Mark the group destroyed. Defeated groups never come back.
    pub fn defeat(&mut self) {
        self.active = false;
        self.selected = false;
    }

    fn shift(&mut self, offset: Vec2) {
        self.position += offset;
        for member in &mut self.members {
            *member += offset;
        }
    }
}

/// A row of groups under construction
#[derive(Debug, Clone, Default)]
pub struct Line {
    pub members: Vec<GroupId>,
}

/// Placement parameters for a wave
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveLayout {
    /// Horizontal room for a row, measured from `start.x`
    pub lane_width: f32,
    /// Top-left corner of the first row
    pub start: Vec2,
    /// Unscaled row height
    pub row_height: f32,
    pub scale: f32,
}

impl WaveLayout {
    /// Vertical distance between rows
    pub fn row_step(&self) -> f32 {
        self.scale * self.row_height
    }
}

/// The groups of one level, in generation order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wave {
    pub level: DifficultyLevel,
    groups: Vec<Group>,
    line_count: usize,
}

impl Wave {
    /// Build a wave from already placed groups
    pub fn new(level: DifficultyLevel, groups: Vec<Group>, line_count: usize) -> Self {
        Self {
            level,
            groups,
            line_count,
        }
    }

    /// Wave with no groups (before the first level starts)
    pub fn empty(level: DifficultyLevel) -> Self {
        Self::new(level, Vec::new(), 0)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    /// Active groups in generation order
    pub fn live(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().filter(|g| g.active)
    }

    pub fn live_ids(&self) -> Vec<GroupId> {
        self.live().map(|g| g.id).collect()
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    pub fn is_cleared(&self) -> bool {
        self.live_count() == 0
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Move every live group down by `dy`
    pub fn descend(&mut self, dy: f32) {
        let offset = Vec2::new(0.0, dy);
        for group in self.groups.iter_mut().filter(|g| g.active) {
            group.shift(offset);
        }
    }
}

/// Builds waves from the tier decks
#[derive(Debug, Clone)]
pub struct WaveBuilder {
    decks: [Deck<Problem>; TIER_COUNT],
    sprites: Cycle<SpriteKind>,
    rng: Pcg32,
    next_id: u32,
}

impl WaveBuilder {
    pub fn new(catalog: &ProblemCatalog, seed: u64) -> Self {
        Self {
            decks: std::array::from_fn(|tier| Deck::new(catalog.tier(tier).to_vec())),
            sprites: Cycle::new(SpriteKind::ALL.to_vec()),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    fn next_group_id(&mut self) -> GroupId {
        let id = GroupId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Build the wave for `level` using `layout`
    pub fn build(&mut self, level: DifficultyLevel, layout: &WaveLayout) -> Wave {
        let count = level.group_count();
        let lane_end = layout.start.x + layout.lane_width;

        let mut groups: Vec<Group> = Vec::with_capacity(count);
        let mut lines: Vec<Line> = Vec::new();
        let mut line = Line::default();
        let mut cursor = layout.start;

        for _ in 0..count {
            let tier = sample_tier(
                &mut self.rng,
                TIER_COUNT,
                usize::from(level.tier_center),
                Some(usize::from(TIER_SPREAD)),
            );
            let Some(problem) = self.draw_problem(tier, &groups) else {
                log::warn!("No problems available for tier {}", tier);
                continue;
            };
            let kind = self.sprites.next_item().unwrap_or(SpriteKind::Crab);
            let id = self.next_group_id();
            let group = Group::new(id, problem, kind, layout.scale, cursor, lines.len());

            line.members.push(id);
            if cursor.x + group.spaced_width > lane_end {
                // This group overflows the lane: close the row after it
                lines.push(std::mem::take(&mut line));
                cursor = Vec2::new(layout.start.x, cursor.y + layout.row_step());
            } else {
                cursor.x += group.spaced_width;
            }
            groups.push(group);
        }
        if !line.members.is_empty() {
            lines.push(line);
        }

        log::info!(
            "Level {}: {} groups on {} lines (tier center {}, stage {})",
            level.display_level,
            groups.len(),
            lines.len(),
            level.tier_center,
            level.stage
        );
        Wave::new(level, groups, lines.len())
    }

    /// Next problem of `tier` not already used by `taken`. Two deck lengths
    /// always span one full shuffled pass; after that uniqueness is dropped.
    fn draw_problem(&mut self, tier: usize, taken: &[Group]) -> Option<Problem> {
        let deck = self.decks.get_mut(tier)?;
        let mut fallback = None;
        for _ in 0..2 * deck.len() {
            let problem = deck.draw(&mut self.rng)?;
            if taken.iter().all(|g| g.problem.key() != problem.key()) {
                return Some(problem);
            }
            log::debug!("Skipping {:?}, already in this wave", problem.factors);
            fallback = Some(problem);
        }
        fallback
    }
}
