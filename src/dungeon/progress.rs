//! Per-user daily clear tracking.

use super::tiers::Tier;
use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DungeonProgress {
    /// Tiers cleared since the last daily reset, each at most once
    pub completed_today: Vec<Tier>,
    /// Lifetime clears, indexed by tier level
    pub total_clears: [u32; 6],
    pub last_reset_ms: i64,
}

fn utc_date(ms: i64) -> Option<NaiveDate> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.date_naive())
}

impl DungeonProgress {
    pub fn new(now_ms: i64) -> Self {
        Self {
            last_reset_ms: now_ms,
            ..Self::default()
        }
    }

    pub fn is_completed_today(&self, tier: Tier) -> bool {
        self.completed_today.contains(&tier)
    }

    /// Records a clear. Returns true when this was the first clear today.
    pub fn record_clear(&mut self, tier: Tier) -> bool {
        self.total_clears[tier.level() as usize] += 1;
        if self.is_completed_today(tier) {
            false
        } else {
            self.completed_today.push(tier);
            true
        }
    }

    pub fn total_clears(&self, tier: Tier) -> u32 {
        self.total_clears[tier.level() as usize]
    }

    /// Clears the daily list when the UTC date of `now_ms` differs from the
    /// last reset. Returns true if a reset happened.
    pub fn roll_over(&mut self, now_ms: i64) -> bool {
        if utc_date(now_ms) == utc_date(self.last_reset_ms) {
            return false;
        }
        self.completed_today.clear();
        self.last_reset_ms = now_ms;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::HOUR_MS;

    // 2024-01-01T00:00:00Z
    const DAY_START: i64 = 1_704_067_200_000;

    #[test]
    fn test_record_clear_first_and_repeat() {
        let mut progress = DungeonProgress::new(DAY_START);
        assert!(progress.record_clear(Tier::E));
        assert!(!progress.record_clear(Tier::E));
        assert_eq!(progress.completed_today, vec![Tier::E]);
        assert_eq!(progress.total_clears(Tier::E), 2);
        assert_eq!(progress.total_clears(Tier::D), 0);
    }

    #[test]
    fn test_roll_over_same_day_keeps_list() {
        let mut progress = DungeonProgress::new(DAY_START);
        progress.record_clear(Tier::C);
        assert!(!progress.roll_over(DAY_START + 23 * HOUR_MS));
        assert!(progress.is_completed_today(Tier::C));
    }

    #[test]
    fn test_roll_over_next_day_clears_list() {
        let mut progress = DungeonProgress::new(DAY_START + 20 * HOUR_MS);
        progress.record_clear(Tier::C);
        assert!(progress.roll_over(DAY_START + 25 * HOUR_MS));
        assert!(progress.completed_today.is_empty());
        assert_eq!(progress.total_clears(Tier::C), 1);
        assert_eq!(progress.last_reset_ms, DAY_START + 25 * HOUR_MS);
    }
}
