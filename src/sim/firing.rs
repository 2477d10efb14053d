//! Firing positions
//!
//! Three fixed slots along the bottom of the playfield. Each one is bound to
//! at most one live group (by id; the wave owns the groups) and collects the
//! digits the player types while standing there. Exactly one slot is the
//! selected one: the slot the ship currently sits at.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::wave::{GroupId, Wave};
use crate::consts::POSITION_COUNT;

/// Ship movement between firing positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// A single firing position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiringPosition {
    pub index: usize,
    answer: u64,
    group: Option<GroupId>,
    /// Prompt variant shown for the bound group
    prompt: Option<String>,
    selected: bool,
}

impl FiringPosition {
    fn new(index: usize) -> Self {
        Self {
            index,
            answer: 0,
            group: None,
            prompt: None,
            selected: false,
        }
    }

    /// Number typed so far
    pub fn answer(&self) -> u64 {
        self.answer
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Bound to a group (disabled positions ignore input)
    pub fn is_enabled(&self) -> bool {
        self.group.is_some()
    }
}

/// How positions were handed out after a group fell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Redistribution {
    /// No live groups left
    LevelComplete,
    /// One group left, kept by the scoring position
    Single,
    /// Two groups left, bound to an adjacent pair of positions
    Pair,
    /// First, median and last live group
    Spread,
}

/// Outcome of firing at a position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult {
    /// Position disabled or its group already gone
    Ignored,
    /// Wrong answer; nothing changed
    Miss { group: GroupId },
    /// Group destroyed and positions redistributed
    Hit {
        group: GroupId,
        tier: u8,
        /// Where the group stood when it was hit
        target: Vec2,
        redistribution: Redistribution,
    },
}

impl MatchResult {
    pub fn is_correct(&self) -> bool {
        matches!(self, MatchResult::Hit { .. })
    }
}

/// The three firing positions and the ship's current slot
#[derive(Debug, Clone)]
pub struct FiringPositions {
    positions: [FiringPosition; POSITION_COUNT],
    selected: usize,
    /// Picks which prompt variant a position shows
    rng: Pcg32,
}

impl FiringPositions {
    /// All positions disabled, position 0 selected
    pub fn new(seed: u64) -> Self {
        let mut positions: [FiringPosition; POSITION_COUNT] = std::array::from_fn(FiringPosition::new);
        positions[0].selected = true;
        Self {
            positions,
            selected: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn positions(&self) -> &[FiringPosition] {
        &self.positions
    }

    pub fn position(&self, index: usize) -> Option<&FiringPosition> {
        self.positions.get(index)
    }

    /// Index of the position the ship is at
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Bind `index` to `group`, clearing its answer. If the position is the
    /// selected one, the highlight moves to the new group.
    pub fn assign(&mut self, index: usize, group: GroupId, wave: &mut Wave) {
        let Some(prompts) = wave.group(group).map(|g| g.problem.prompts.clone()) else {
            log::warn!("Cannot assign unknown group {:?} to position {}", group, index);
            return;
        };
        let variant = usize::from(self.rng.random_bool(0.5));
        let Some(position) = self.positions.get_mut(index) else {
            return;
        };

        let previous = position.group.replace(group);
        position.answer = 0;
        position.prompt = prompts.into_iter().nth(variant);

        if position.selected {
            if let Some(old) = previous.filter(|old| *old != group) {
                if let Some(old) = wave.group_mut(old) {
                    old.deselect();
                }
            }
            if let Some(target) = wave.group_mut(group) {
                target.select();
            }
        }
    }

    /// Unbind a position. It ignores input until assigned again.
    pub fn disable(&mut self, index: usize, wave: &mut Wave) {
        let Some(position) = self.positions.get_mut(index) else {
            return;
        };
        if let Some(group) = position.group.take() {
            if position.selected {
                if let Some(group) = wave.group_mut(group) {
                    group.deselect();
                }
            }
        }
        position.prompt = None;
        position.answer = 0;
    }

    pub fn disable_all(&mut self, wave: &mut Wave) {
        for index in 0..POSITION_COUNT {
            self.disable(index, wave);
        }
    }

    /// Make `index` the selected position, deselecting any other first
    pub fn select(&mut self, index: usize, wave: &mut Wave) {
        if index >= POSITION_COUNT {
            return;
        }
        for other in (0..POSITION_COUNT).filter(|other| *other != index) {
            self.deselect(other, wave);
        }
        let position = &mut self.positions[index];
        position.selected = true;
        if let Some(group) = position.group.and_then(|id| wave.group_mut(id)) {
            group.select();
        }
        self.selected = index;
    }

    /// Drop the selection flag of `index` and un-highlight its group
    pub fn deselect(&mut self, index: usize, wave: &mut Wave) {
        let Some(position) = self.positions.get_mut(index) else {
            return;
        };
        position.selected = false;
        if let Some(group) = position.group.and_then(|id| wave.group_mut(id)) {
            group.deselect();
        }
    }

    /// Move the ship one slot. Returns false at the edges.
    pub fn navigate(&mut self, direction: Direction, wave: &mut Wave) -> bool {
        let target = match direction {
            Direction::Left => self.selected.checked_sub(1),
            Direction::Right => Some(self.selected + 1).filter(|i| *i < POSITION_COUNT),
        };
        match target {
            Some(target) => {
                self.select(target, wave);
                true
            }
            None => false,
        }
    }

    /// Append a digit to the answer at `index`
    pub fn add_digit(&mut self, index: usize, digit: u8) {
        if digit > 9 {
            return;
        }
        if let Some(position) = self.positions.get_mut(index).filter(|p| p.is_enabled()) {
            // Saturates instead of overflowing on absurdly long input
            position.answer = position.answer.saturating_mul(10).saturating_add(u64::from(digit));
        }
    }

    /// Drop the last digit of the answer at `index`
    pub fn delete_digit(&mut self, index: usize) {
        if let Some(position) = self.positions.get_mut(index).filter(|p| p.is_enabled()) {
            position.answer /= 10;
        }
    }

    /// Fire at the group bound to `index`
    pub fn evaluate(&mut self, index: usize, wave: &mut Wave) -> MatchResult {
        let Some(position) = self.positions.get(index) else {
            return MatchResult::Ignored;
        };
        let Some(group_id) = position.group else {
            return MatchResult::Ignored;
        };
        let answer = position.answer;
        let Some(group) = wave.group_mut(group_id).filter(|g| g.active) else {
            return MatchResult::Ignored;
        };

        if answer != group.problem.product {
            return MatchResult::Miss { group: group_id };
        }

        let tier = group.tier;
        let target = group.center();
        group.defeat();
        self.positions[index].answer = 0;
        let redistribution = self.redistribute(index, wave);
        MatchResult::Hit {
            group: group_id,
            tier,
            target,
            redistribution,
        }
    }

    /// Hand the live groups out to the positions.
    ///
    /// `scorer` is the position that just destroyed a group (or the ship's
    /// position when a level starts).
    pub fn redistribute(&mut self, scorer: usize, wave: &mut Wave) -> Redistribution {
        let live = wave.live_ids();
        let outcome = match live.as_slice() {
            [] => {
                self.disable_all(wave);
                Redistribution::LevelComplete
            }
            [only] => {
                for index in 0..POSITION_COUNT {
                    if index == scorer {
                        self.assign(index, *only, wave);
                    } else {
                        self.disable(index, wave);
                    }
                }
                Redistribution::Single
            }
            [first, second] => {
                if scorer == 0 {
                    self.disable(2, wave);
                    self.assign(0, *first, wave);
                    self.assign(1, *second, wave);
                } else {
                    self.disable(0, wave);
                    self.assign(1, *first, wave);
                    self.assign(2, *second, wave);
                }
                Redistribution::Pair
            }
            [first, .., last] => {
                // Median rounding half up: round((n - 1) / 2) == n / 2
                let median = live[live.len() / 2];
                self.assign(0, *first, wave);
                self.assign(1, median, wave);
                self.assign(2, *last, wave);
                Redistribution::Spread
            }
        };
        log::debug!("{} live groups after position {}: {:?}", live.len(), scorer, outcome);
        outcome
    }

    /// Initial placement for a fresh wave
    pub fn place(&mut self, wave: &mut Wave) -> Redistribution {
        self.redistribute(self.selected, wave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::problems::ProblemCatalog;
    use crate::sim::wave::{Group, LEVELS, SpriteKind};
    use proptest::prelude::*;

    fn wave_of(n: usize) -> Wave {
        let catalog = ProblemCatalog::new();
        let groups = catalog
            .tiers()
            .iter()
            .flatten()
            .skip(30)
            .take(n)
            .enumerate()
            .map(|(i, p)| Group::new(GroupId::new(i as u32 + 1), p.clone(), SpriteKind::Crab, 1.0, Vec2::ZERO, 0))
            .collect();
        Wave::new(LEVELS[0], groups, 1)
    }

    fn id(n: u32) -> Option<GroupId> {
        Some(GroupId::new(n))
    }

    fn bound(positions: &FiringPositions) -> Vec<Option<GroupId>> {
        positions.positions().iter().map(FiringPosition::group).collect()
    }

    fn answer(positions: &mut FiringPositions, index: usize, wave: &mut Wave) -> MatchResult {
        let group = positions.position(index).and_then(FiringPosition::group);
        let product = group.and_then(|g| wave.group(g)).map(|g| g.problem.product);
        if let Some(product) = product {
            for digit in product.to_string().bytes() {
                positions.add_digit(index, digit - b'0');
            }
        }
        positions.evaluate(index, wave)
    }

    #[test]
    fn test_digit_entry() {
        let mut wave = wave_of(3);
        let mut positions = FiringPositions::new(1);
        positions.place(&mut wave);
        positions.add_digit(0, 3);
        positions.add_digit(0, 7);
        assert_eq!(positions.positions()[0].answer(), 37);
        positions.delete_digit(0);
        assert_eq!(positions.positions()[0].answer(), 3);
        positions.add_digit(0, 12);
        assert_eq!(positions.positions()[0].answer(), 3);
    }

    #[test]
    fn test_disabled_position_ignores_input() {
        let mut wave = wave_of(1);
        let mut positions = FiringPositions::new(1);
        assert_eq!(positions.place(&mut wave), Redistribution::Single);
        assert!(!positions.positions()[2].is_enabled());
        positions.add_digit(2, 5);
        positions.delete_digit(2);
        assert_eq!(positions.positions()[2].answer(), 0);
        assert_eq!(positions.evaluate(2, &mut wave), MatchResult::Ignored);
        assert_eq!(positions.evaluate(7, &mut wave), MatchResult::Ignored);
    }

    #[test]
    fn test_spread_placement() {
        let mut wave = wave_of(4);
        let mut positions = FiringPositions::new(1);
        assert_eq!(positions.place(&mut wave), Redistribution::Spread);
        assert_eq!(bound(&positions), vec![id(1), id(3), id(4)]);
        assert!(positions.positions().iter().all(|p| p.prompt().is_some()));
    }

    #[test]
    fn test_miss_changes_nothing() {
        let mut wave = wave_of(3);
        let mut positions = FiringPositions::new(1);
        positions.place(&mut wave);
        let product = wave.groups()[0].problem.product;
        positions.add_digit(0, 9);
        positions.add_digit(0, 9);
        positions.add_digit(0, 9);
        assert_ne!(product, 999);
        assert_eq!(positions.evaluate(0, &mut wave), MatchResult::Miss { group: GroupId::new(1) });
        assert_eq!(positions.positions()[0].answer(), 999);
        assert_eq!(wave.live_count(), 3);
    }

    #[test]
    fn test_two_left_after_scoring_at_zero() {
        let mut wave = wave_of(3);
        let mut positions = FiringPositions::new(1);
        positions.place(&mut wave);
        let result = answer(&mut positions, 0, &mut wave);
        assert!(result.is_correct());
        assert!(matches!(result, MatchResult::Hit { redistribution: Redistribution::Pair, .. }));
        assert_eq!(bound(&positions), vec![id(2), id(3), None]);
    }

    #[test]
    fn test_two_left_after_scoring_elsewhere() {
        let mut wave = wave_of(3);
        let mut positions = FiringPositions::new(1);
        positions.place(&mut wave);
        answer(&mut positions, 2, &mut wave);
        assert_eq!(bound(&positions), vec![None, id(1), id(2)]);

        let mut wave = wave_of(3);
        let mut positions = FiringPositions::new(1);
        positions.place(&mut wave);
        answer(&mut positions, 1, &mut wave);
        assert_eq!(bound(&positions), vec![None, id(1), id(3)]);
    }

    #[test]
    fn test_last_group_stays_with_scorer() {
        let mut wave = wave_of(2);
        let mut positions = FiringPositions::new(1);
        assert_eq!(positions.place(&mut wave), Redistribution::Pair);
        assert_eq!(bound(&positions), vec![id(1), id(2), None]);

        let result = answer(&mut positions, 1, &mut wave);
        assert!(matches!(result, MatchResult::Hit { redistribution: Redistribution::Single, .. }));
        assert_eq!(bound(&positions), vec![None, id(1), None]);

        let result = answer(&mut positions, 1, &mut wave);
        assert!(matches!(
            result,
            MatchResult::Hit { redistribution: Redistribution::LevelComplete, .. }
        ));
        assert_eq!(bound(&positions), vec![None, None, None]);
        assert!(wave.is_cleared());
    }

    #[test]
    fn test_hit_reports_group_center() {
        let mut wave = wave_of(3);
        let mut positions = FiringPositions::new(1);
        positions.place(&mut wave);
        let center = wave.group(GroupId::new(1)).map(Group::center);
        match answer(&mut positions, 0, &mut wave) {
            MatchResult::Hit { group, target, .. } => {
                assert_eq!(group, GroupId::new(1));
                assert_eq!(Some(target), center);
            }
            other => panic!("expected a hit, got {other:?}"),
        }
    }

    #[test]
    fn test_spread_after_defeat_uses_live_order() {
        let mut wave = wave_of(5);
        let mut positions = FiringPositions::new(1);
        positions.place(&mut wave);
        assert_eq!(bound(&positions), vec![id(1), id(3), id(5)]);
        answer(&mut positions, 1, &mut wave);
        // Live: 1, 2, 4, 5 -> median index 2
        assert_eq!(bound(&positions), vec![id(1), id(4), id(5)]);
        assert!(positions.positions().iter().all(|p| p.answer() == 0));
    }

    #[test]
    fn test_highlight_follows_selected_position() {
        let mut wave = wave_of(5);
        let mut positions = FiringPositions::new(1);
        positions.place(&mut wave);
        positions.select(1, &mut wave);
        let selected: Vec<_> = wave.groups().iter().filter(|g| g.selected).map(|g| g.id).collect();
        assert_eq!(selected, vec![GroupId::new(3)]);

        answer(&mut positions, 1, &mut wave);
        let selected: Vec<_> = wave.groups().iter().filter(|g| g.selected).map(|g| g.id).collect();
        assert_eq!(selected, vec![GroupId::new(4)]);
        assert_eq!(positions.positions().iter().filter(|p| p.is_selected()).count(), 1);
    }

    #[test]
    fn test_navigate_clamps() {
        let mut wave = wave_of(3);
        let mut positions = FiringPositions::new(1);
        positions.place(&mut wave);
        assert!(!positions.navigate(Direction::Left, &mut wave));
        assert!(positions.navigate(Direction::Right, &mut wave));
        assert!(positions.navigate(Direction::Right, &mut wave));
        assert!(!positions.navigate(Direction::Right, &mut wave));
        assert_eq!(positions.selected(), 2);
        assert!(positions.positions()[2].is_selected());
        assert!(!positions.positions()[0].is_selected());
        assert!(wave.group(GroupId::new(3)).is_some_and(|g| g.selected));
        assert!(wave.group(GroupId::new(1)).is_some_and(|g| !g.selected));
    }

    proptest! {
        #[test]
        fn prop_digits_accumulate(digits in proptest::collection::vec(0u8..10, 1..18)) {
            let mut wave = wave_of(3);
            let mut positions = FiringPositions::new(1);
            positions.place(&mut wave);
            for digit in &digits {
                positions.add_digit(0, *digit);
            }
            let expected = digits.iter().fold(0u64, |acc, d| acc * 10 + u64::from(*d));
            prop_assert_eq!(positions.positions()[0].answer(), expected);
            positions.delete_digit(0);
            prop_assert_eq!(positions.positions()[0].answer(), expected / 10);
        }
    }
}
