//! Multiplication fact catalog
//!
//! Every fact `a * b` with `0 <= a <= b <= 12` is classified into one of five
//! difficulty tiers together with the trick (rule) that helps solve it.
//! Classification is a pure decision table; the first matching row wins.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FACTOR, PAIR_COUNT, TIER_COUNT};

/// The solving trick attached to a fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// 0 * n
    Zero,
    /// 1 * n
    Identity,
    /// 10 * n
    Ten,
    /// 2 * n
    Doubling,
    /// 12 * 3 and 12 * 4
    DoublingPattern,
    /// 5 * n
    Five,
    /// 11 * single digit
    RepeatDigit,
    /// 9 * n
    NinesComplement,
    /// No trick
    Memorize,
}

impl Rule {
    /// Short name of the rule
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Zero => "zero rule",
            Rule::Identity => "identity rule",
            Rule::Ten => "ten rule",
            Rule::Doubling => "doubling rule",
            Rule::DoublingPattern => "doubling pattern",
            Rule::Five => "five rule",
            Rule::RepeatDigit => "repeat-digit rule",
            Rule::NinesComplement => "nine's-complement rule",
            Rule::Memorize => "memorize",
        }
    }

    /// Hint shown to the player after a wrong answer
    pub fn hint(&self) -> &'static str {
        match self {
            Rule::Zero => "Zero rule: zero times any number is zero",
            Rule::Identity => "Identity rule: one times any number is that same number",
            Rule::Ten => "Ten rule: 10 * ? (like 4 * 10) - write a zero after the other number (40)",
            Rule::Doubling => "Doubling rule: 2 * ? (like 2 * 5) - add the other number to itself (5 + 5 = 10)",
            Rule::DoublingPattern => {
                "Doubling pattern: 12 * 3 = 36 and 12 * 4 = 48 - the last digit is twice the first"
            }
            Rule::Five => {
                "Five rule: 5 * ? (like 5 * 8) - multiply by 10 (80), then take half of that (40)"
            }
            Rule::RepeatDigit => "Repeat-digit rule: 11 * single digit (like 6 * 11) - write the digit twice (66)",
            Rule::NinesComplement => {
                "Nine's-complement rule: 9 * ? (like 6 * 9) - take one away from the other number (5), \
                 then take that from 9 (4), and write the two digits in order (54)"
            }
            Rule::Memorize => "Memorize: this one you just have to learn by heart",
        }
    }
}

/// A classified multiplication fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Factors in the order they were classified
    pub factors: (u8, u8),
    pub product: u64,
    /// Difficulty tier, 0..TIER_COUNT
    pub tier: u8,
    pub rule: Rule,
    /// Both orderings of the prompt ("a × b", "b × a")
    pub prompts: [String; 2],
}

impl Problem {
    /// Hint text for this fact
    pub fn hint(&self) -> &'static str {
        self.rule.hint()
    }

    /// Identity of the fact: the factor pair with the smaller factor first
    pub fn key(&self) -> (u8, u8) {
        let (a, b) = self.factors;
        (a.min(b), a.max(b))
    }
}

/// Classify the fact `a * b`.
///
/// Valid for `0 <= a, b <= 12` in either order. Tier, rule and product do not
/// depend on the order of the factors; `factors` and `prompts` keep it.
/// Factors above 12 are a caller bug.
pub fn classify(a: u8, b: u8) -> Problem {
    debug_assert!(
        a <= MAX_FACTOR && b <= MAX_FACTOR,
        "factors must be within 0..={MAX_FACTOR}, got {a} * {b}"
    );
    let (tier, rule) = decide(a.min(b), a.max(b));
    Problem {
        factors: (a, b),
        product: u64::from(a) * u64::from(b),
        tier,
        rule,
        prompts: [format!("{a} × {b}"), format!("{b} × {a}")],
    }
}

/// Decision table over an ordered pair `low <= high`
fn decide(low: u8, high: u8) -> (u8, Rule) {
    match (low, high) {
        (0, _) => (0, Rule::Zero),
        (1, _) => (0, Rule::Identity),
        (10, _) => (1, Rule::Ten),
        (2, _) => (1, Rule::Doubling),
        (_, 10) => (1, Rule::Ten),
        (3 | 4, 12) => (3, Rule::DoublingPattern),
        (5, 12) => (2, Rule::Five),
        (_, 12) => (4, Rule::Memorize),
        (low, 11) if low < 10 => (1, Rule::RepeatDigit),
        (_, 11) => (4, Rule::Memorize),
        (_, 9) => (2, Rule::NinesComplement),
        (5, _) | (_, 5) => (2, Rule::Five),
        (3 | 4, _) => (3, Rule::Memorize),
        _ => (4, Rule::Memorize),
    }
}

/// Lazy row-major walk over every pair `0 <= a <= b <= 12`
#[derive(Debug, Clone)]
pub struct FactorPairs {
    next: Option<(u8, u8)>,
}

impl Iterator for FactorPairs {
    type Item = (u8, u8);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let (a, b) = current;
        self.next = if b < MAX_FACTOR {
            Some((a, b + 1))
        } else if a < MAX_FACTOR {
            Some((a + 1, a + 1))
        } else {
            None
        };
        Some(current)
    }
}

/// All unique factor pairs, smaller factor first
pub fn generate() -> FactorPairs {
    FactorPairs { next: Some((0, 0)) }
}

/// Classify every generated pair into its tier bucket, keeping generation order
pub fn make_groups() -> [Vec<Problem>; TIER_COUNT] {
    let mut tiers: [Vec<Problem>; TIER_COUNT] = Default::default();
    for (a, b) in generate() {
        let problem = classify(a, b);
        tiers[usize::from(problem.tier)].push(problem);
    }
    tiers
}

/// The full problem set partitioned by tier. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct ProblemCatalog {
    tiers: [Vec<Problem>; TIER_COUNT],
}

impl Default for ProblemCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ProblemCatalog {
    pub fn new() -> Self {
        let tiers = make_groups();
        debug_assert_eq!(tiers.iter().map(Vec::len).sum::<usize>(), PAIR_COUNT);
        Self { tiers }
    }

    /// Problems of one tier in generation order (empty for unknown tiers)
    pub fn tier(&self, tier: usize) -> &[Problem] {
        self.tiers.get(tier).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tiers(&self) -> &[Vec<Problem>; TIER_COUNT] {
        &self.tiers
    }

    /// Total number of problems across all tiers
    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_starts_at_zero_zero() {
        assert_eq!(generate().next(), Some((0, 0)));
    }

    #[test]
    fn test_generate_yields_every_pair_once() {
        let pairs: Vec<_> = generate().collect();
        assert_eq!(pairs.len(), PAIR_COUNT);
        assert!(pairs.iter().all(|(a, b)| a <= b && *b <= MAX_FACTOR));
        let unique: HashSet<_> = pairs.iter().collect();
        assert_eq!(unique.len(), PAIR_COUNT);
        assert_eq!(pairs.last(), Some(&(12, 12)));
    }

    #[test]
    fn test_make_groups_partitions_catalog() {
        let groups = make_groups();
        assert_eq!(groups.len(), TIER_COUNT);
        assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), PAIR_COUNT);
        for (tier, problems) in groups.iter().enumerate() {
            assert!(!problems.is_empty(), "tier {tier} is empty");
            assert!(problems.iter().all(|p| usize::from(p.tier) == tier));
        }
        assert_eq!(
            groups.iter().map(Vec::len).collect::<Vec<_>>(),
            vec![25, 28, 14, 11, 13]
        );
    }

    #[test]
    fn test_zero_and_one_are_tier_zero() {
        for n in 0..=MAX_FACTOR {
            let zero = classify(0, n);
            assert_eq!(zero.tier, 0);
            assert_eq!(zero.product, 0);
            if n > 0 {
                assert_eq!(zero.rule, Rule::Zero);
            }
            assert_eq!(classify(1, n).tier, 0);
        }
        assert_eq!(classify(1, 5).rule, Rule::Identity);
        assert_eq!(classify(1, 5).product, 5);
    }

    #[test]
    fn test_classify_rules() {
        let five = classify(5, 8);
        assert_eq!((five.tier, five.rule), (2, Rule::Five));
        assert!(five.hint().contains("Five rule"));

        let nine = classify(9, 6);
        assert_eq!((nine.tier, nine.rule), (2, Rule::NinesComplement));
        assert!(nine.hint().contains("Nine's-complement"));

        let pattern = classify(3, 12);
        assert_eq!((pattern.tier, pattern.rule), (3, Rule::DoublingPattern));
        assert!(pattern.hint().contains("Doubling pattern"));

        let hard = classify(7, 7);
        assert_eq!((hard.tier, hard.rule), (4, Rule::Memorize));
        assert!(hard.hint().contains("Memorize"));
    }

    #[test]
    fn test_classify_precedence() {
        assert_eq!(classify(10, 12).rule, Rule::Ten);
        assert_eq!(classify(2, 10).rule, Rule::Doubling);
        assert_eq!(classify(7, 10).rule, Rule::Ten);
        assert_eq!(classify(5, 12).tier, 2);
        assert_eq!(classify(6, 12).tier, 4);
        assert_eq!(classify(9, 11).rule, Rule::RepeatDigit);
        assert_eq!(classify(11, 11).tier, 4);
        assert_eq!(classify(5, 9).rule, Rule::NinesComplement);
        assert_eq!(classify(3, 5).rule, Rule::Five);
        assert_eq!((classify(4, 7).tier, classify(4, 7).rule), (3, Rule::Memorize));
        assert_eq!(classify(8, 6).tier, 4);
    }

    #[test]
    fn test_prompts_keep_factor_order() {
        let problem = classify(9, 6);
        assert_eq!(problem.factors, (9, 6));
        assert_eq!(problem.prompts, ["9 × 6".to_string(), "6 × 9".to_string()]);
        assert_eq!(problem.key(), (6, 9));
    }

    #[test]
    fn test_catalog_tier_lookup() {
        let catalog = ProblemCatalog::new();
        assert_eq!(catalog.len(), PAIR_COUNT);
        assert!(catalog.tier(TIER_COUNT).is_empty());
        assert_eq!(catalog.tier(0)[0].factors, (0, 0));
    }

    proptest! {
        #[test]
        fn prop_classify_symmetric(a in 0..=MAX_FACTOR, b in 0..=MAX_FACTOR) {
            let forward = classify(a, b);
            let backward = classify(b, a);
            prop_assert_eq!(forward.tier, backward.tier);
            prop_assert_eq!(forward.rule, backward.rule);
            prop_assert_eq!(forward.product, backward.product);
            prop_assert_eq!(forward.factors, (a, b));
            prop_assert_eq!(backward.factors, (b, a));
            prop_assert!(usize::from(forward.tier) < TIER_COUNT);
        }
    }
}
