use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::sets::Word;

/// Counters at or above this value all get the floor weight of 1.
pub const WEIGHT_CEILING: u32 = 20;

/// Picks the next word from a pool the caller has already filtered.
///
/// Policies never look at learned status or history; they only rank by
/// progress counter. An empty pool yields `None`.
pub trait SelectionPolicy: Send {
    fn select<'a>(&self, pool: &'a [Word], rng: &mut dyn RngCore) -> Option<&'a Word>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    #[default]
    Weighted,
    MinimumTier,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 2] = [PolicyKind::Weighted, PolicyKind::MinimumTier];

    pub fn build(self) -> Box<dyn SelectionPolicy> {
        match self {
            PolicyKind::Weighted => Box::new(WeightedPolicy),
            PolicyKind::MinimumTier => Box::new(MinimumTierPolicy::default()),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            PolicyKind::Weighted => "weighted",
            PolicyKind::MinimumTier => "minimum-tier",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

pub fn weight(word: &Word) -> u32 {
    WEIGHT_CEILING.saturating_sub(word.progress_counter).max(1)
}

/// Weighted draw favouring low counters: weight `max(1, 20 - counter)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WeightedPolicy;

impl SelectionPolicy for WeightedPolicy {
    fn select<'a>(&self, pool: &'a [Word], rng: &mut dyn RngCore) -> Option<&'a Word> {
        if pool.is_empty() {
            return None;
        }
        let total: u64 = pool.iter().map(|w| weight(w) as u64).sum();
        let roll = rng.gen_range(0..total);

        let mut cumulative = 0u64;
        for word in pool {
            cumulative += weight(word) as u64;
            if cumulative > roll {
                return Some(word);
            }
        }
        pool.last()
    }
}

/// Uniform pick among the words sharing the lowest counter.
///
/// With `widen` set, a lone minimum is joined by the next tier when that tier
/// sits exactly one above it, so a single stubborn word is not shown forever.
#[derive(Clone, Copy, Debug)]
pub struct MinimumTierPolicy {
    pub widen: bool,
}

impl Default for MinimumTierPolicy {
    fn default() -> Self {
        Self { widen: true }
    }
}

impl SelectionPolicy for MinimumTierPolicy {
    fn select<'a>(&self, pool: &'a [Word], rng: &mut dyn RngCore) -> Option<&'a Word> {
        let min = pool.iter().map(|w| w.progress_counter).min()?;
        let mut tier: Vec<&Word> = pool.iter().filter(|w| w.progress_counter == min).collect();

        if self.widen && tier.len() == 1 {
            let next = pool
                .iter()
                .map(|w| w.progress_counter)
                .filter(|&c| c > min)
                .min();
            if let Some(next) = next.filter(|&n| n - min <= 1) {
                tier.extend(pool.iter().filter(|w| w.progress_counter == next));
            }
        }

        tier.choose(rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn pool(counters: &[u32]) -> Vec<Word> {
        counters
            .iter()
            .enumerate()
            .map(|(i, &c)| Word::new(format!("w{i}"), format!("h{i}"), &["a"]).with_counter(c))
            .collect()
    }

    #[test]
    fn test_weight_floor() {
        let words = pool(&[0, 10, 19, 20, 50]);
        let weights: Vec<u32> = words.iter().map(weight).collect();
        assert_eq!(weights, vec![20, 10, 1, 1, 1]);
    }

    #[test]
    fn test_empty_pool_returns_none() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(WeightedPolicy.select(&[], &mut rng).is_none());
        assert!(MinimumTierPolicy::default().select(&[], &mut rng).is_none());
    }

    #[test]
    fn test_weighted_prefers_low_counters() {
        let words = pool(&[0, 10]);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut low = 0;
        let mut high = 0;
        for _ in 0..3000 {
            match WeightedPolicy.select(&words, &mut rng).map(|w| w.id.as_str()) {
                Some("w0") => low += 1,
                Some("w1") => high += 1,
                other => panic!("unexpected pick {other:?}"),
            }
        }
        assert!(high > 0, "every candidate keeps a nonzero chance");
        assert!(low > high, "counter 0 picked {low} times vs counter 10 {high}");
    }

    #[test]
    fn test_weighted_single_word() {
        let words = pool(&[30]);
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(WeightedPolicy.select(&words, &mut rng).unwrap().id, "w0");
    }

    #[test]
    fn test_minimum_tier_only_picks_lowest() {
        let words = pool(&[3, 1, 1, 5]);
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            let picked = MinimumTierPolicy::default().select(&words, &mut rng).unwrap();
            assert_eq!(picked.progress_counter, 1);
        }
    }

    #[test]
    fn test_minimum_tier_widens_lone_minimum() {
        let words = pool(&[0, 1, 1, 4]);
        let mut rng = SmallRng::seed_from_u64(9);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let picked = MinimumTierPolicy::default().select(&words, &mut rng).unwrap();
            assert!(picked.progress_counter <= 1);
            seen.insert(picked.id.clone());
        }
        assert_eq!(seen.len(), 3);

        let strict = MinimumTierPolicy { widen: false };
        for _ in 0..50 {
            assert_eq!(strict.select(&words, &mut rng).unwrap().id, "w0");
        }
    }

    #[test]
    fn test_minimum_tier_no_widen_across_gap() {
        let words = pool(&[0, 2]);
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..50 {
            assert_eq!(
                MinimumTierPolicy::default().select(&words, &mut rng).unwrap().id,
                "w0"
            );
        }
    }

    #[test]
    fn test_policy_kind_serde_keys() {
        assert_eq!(PolicyKind::from_key("minimum-tier"), Some(PolicyKind::MinimumTier));
        assert_eq!(PolicyKind::from_key("bogus"), None);
        let json = serde_json::to_string(&PolicyKind::MinimumTier).unwrap();
        assert_eq!(json, "\"minimum-tier\"");
    }
}
