//! Progression Tracker
//!
//! Score, combo and hit/miss counters. Everything except `combo` only
//! grows; `combo` drops straight to zero on a miss.

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::game::judgment::Tier;

/// Accumulated session progress.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    /// Total points
    pub score: u32,
    /// Current consecutive hits
    pub combo: u32,
    /// Highest combo reached
    pub max_combo: u32,
    /// Successful judgments
    pub hits: u32,
    /// Misses (auto-missed notes and failed presses)
    pub misses: u32,
    /// Hits per tier, indexed by `Tier as usize`
    pub tier_counts: [u32; 3],
}

impl Progression {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hit of the given tier. Returns the points awarded.
    pub fn register_hit(&mut self, tier: Tier) -> u32 {
        let points = tier.points();
        self.score = self.score.saturating_add(points);
        self.combo = self.combo.saturating_add(1);
        self.max_combo = self.max_combo.max(self.combo);
        self.hits = self.hits.saturating_add(1);
        self.tier_counts[tier as usize] = self.tier_counts[tier as usize].saturating_add(1);
        points
    }

    /// Record a miss.
    pub fn register_miss(&mut self) {
        self.combo = 0;
        self.misses = self.misses.saturating_add(1);
    }

    /// Total judged attempts.
    #[inline]
    pub fn attempts(&self) -> u32 {
        self.hits.saturating_add(self.misses)
    }

    /// Hit percentage rounded down; 0 before any attempt.
    pub fn accuracy(&self) -> u32 {
        let total = self.attempts() as u64;
        if total == 0 {
            return 0;
        }
        (self.hits as u64 * 100 / total) as u32
    }

    /// Hits recorded for one tier.
    pub fn tier_count(&self, tier: Tier) -> u32 {
        self.tier_counts[tier as usize]
    }

    /// Hash into engine state digest.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.score);
        hasher.update_u32(self.combo);
        hasher.update_u32(self.max_combo);
        hasher.update_u32(self.hits);
        hasher.update_u32(self.misses);
        for count in self.tier_counts {
            hasher.update_u32(count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_points_per_tier() {
        let mut p = Progression::new();
        assert_eq!(p.register_hit(Tier::Perfect), 300);
        assert_eq!(p.register_hit(Tier::Great), 150);
        assert_eq!(p.register_hit(Tier::Good), 75);
        assert_eq!(p.score, 525);
        assert_eq!(p.combo, 3);
        assert_eq!(p.hits, 3);
        assert_eq!(p.tier_count(Tier::Perfect), 1);
        assert_eq!(p.tier_count(Tier::Great), 1);
        assert_eq!(p.tier_count(Tier::Good), 1);
    }

    #[test]
    fn test_miss_resets_combo_only() {
        let mut p = Progression::new();
        p.register_hit(Tier::Perfect);
        p.register_hit(Tier::Perfect);
        p.register_miss();

        assert_eq!(p.combo, 0);
        assert_eq!(p.max_combo, 2);
        assert_eq!(p.score, 600);
        assert_eq!(p.misses, 1);
    }

    #[test]
    fn test_max_combo_is_high_water_mark() {
        let mut p = Progression::new();
        for _ in 0..5 {
            p.register_hit(Tier::Good);
        }
        p.register_miss();
        for _ in 0..3 {
            p.register_hit(Tier::Good);
        }

        assert_eq!(p.combo, 3);
        assert_eq!(p.max_combo, 5);
    }

    #[test]
    fn test_accuracy() {
        let mut p = Progression::new();
        assert_eq!(p.accuracy(), 0);

        for _ in 0..3 {
            p.register_hit(Tier::Great);
        }
        p.register_miss();
        assert_eq!(p.accuracy(), 75);

        // 2 / 3 = 66.67 rounds down
        let mut q = Progression::new();
        q.register_hit(Tier::Good);
        q.register_hit(Tier::Good);
        q.register_miss();
        assert_eq!(q.accuracy(), 66);
    }

    #[test]
    fn test_all_misses_accuracy_zero() {
        let mut p = Progression::new();
        p.register_miss();
        p.register_miss();
        assert_eq!(p.accuracy(), 0);
        assert_eq!(p.score, 0);
    }
}
