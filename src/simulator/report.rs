//! Simulation report generation.

use super::config::SimConfig;
use crate::dungeon::tiers::Tier;
use serde::Serialize;
use std::collections::BTreeMap;

/// What one simulated hero did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub clears: u32,
    pub first_clears: u32,
    pub defeats: u32,
    pub retreats: u32,
    pub final_level: u32,
    pub final_coins: u64,
    pub xp_earned: u64,
    pub coins_earned: u64,
    pub items_found: u32,
    pub captures: u32,
    pub chests_opened: u32,
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub tier: Tier,
    pub dungeons_attempted: u64,

    pub clear_rate: f64,
    pub defeat_rate: f64,
    pub retreat_rate: f64,

    pub avg_final_level: f64,
    pub avg_xp_earned: f64,
    pub avg_coins_earned: f64,
    pub avg_items_found: f64,
    pub avg_captures: f64,

    pub level_distribution: BTreeMap<u32, u32>,

    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    pub fn from_runs(config: &SimConfig, runs: Vec<RunStats>) -> Self {
        let num_runs = runs.len() as u32;
        let per_run = num_runs.max(1) as f64;
        let dungeons_attempted: u64 = runs
            .iter()
            .map(|r| (r.clears + r.defeats + r.retreats) as u64)
            .sum();
        let per_dungeon = dungeons_attempted.max(1) as f64;

        let rate = |f: fn(&RunStats) -> u32| {
            runs.iter().map(|r| f(r) as f64).sum::<f64>() / per_dungeon
        };
        let clear_rate = rate(|r| r.clears);
        let defeat_rate = rate(|r| r.defeats);
        let retreat_rate = rate(|r| r.retreats);

        let avg_final_level = runs.iter().map(|r| r.final_level as f64).sum::<f64>() / per_run;
        let avg_xp_earned = runs.iter().map(|r| r.xp_earned as f64).sum::<f64>() / per_run;
        let avg_coins_earned = runs.iter().map(|r| r.coins_earned as f64).sum::<f64>() / per_run;
        let avg_items_found = runs.iter().map(|r| r.items_found as f64).sum::<f64>() / per_run;
        let avg_captures = runs.iter().map(|r| r.captures as f64).sum::<f64>() / per_run;

        let mut level_distribution = BTreeMap::new();
        for run in &runs {
            *level_distribution.entry(run.final_level).or_insert(0) += 1;
        }

        Self {
            num_runs,
            tier: config.tier,
            dungeons_attempted,
            clear_rate,
            defeat_rate,
            retreat_rate,
            avg_final_level,
            avg_xp_earned,
            avg_coins_earned,
            avg_items_found,
            avg_captures,
            level_distribution,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} heroes, {} dungeons at tier {}\n\n",
            self.num_runs, self.dungeons_attempted, self.tier
        ));

        report.push_str("── OUTCOMES ─────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Clear Rate:      {:.1}%\n", self.clear_rate * 100.0));
        report.push_str(&format!("  Defeat Rate:     {:.1}%\n", self.defeat_rate * 100.0));
        report.push_str(&format!("  Retreat Rate:    {:.1}%\n\n", self.retreat_rate * 100.0));

        report.push_str("── REWARDS ──────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Final Level: {:.1}\n", self.avg_final_level));
        report.push_str(&format!("  Avg XP Earned:   {:.0}\n", self.avg_xp_earned));
        report.push_str(&format!("  Avg Coins:       {:.0}\n", self.avg_coins_earned));
        report.push_str(&format!("  Avg Items:       {:.1}\n", self.avg_items_found));
        report.push_str(&format!("  Avg Captures:    {:.2}\n\n", self.avg_captures));

        report.push_str("── FINAL LEVELS ─────────────────────────────────────────────────\n");
        for (level, count) in &self.level_distribution {
            let pct = (*count as f64 / self.num_runs.max(1) as f64) * 100.0;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  Level {:3}: {:>5.1}% {}\n", level, pct, bar));
        }

        if self.defeat_rate > 0.5 {
            report.push_str("\n  ⚠️  Most dungeons end in defeat - tier too hard at this level?\n");
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_generation() {
        let runs = vec![
            RunStats {
                clears: 3,
                defeats: 1,
                final_level: 4,
                captures: 2,
                ..Default::default()
            },
            RunStats {
                clears: 1,
                defeats: 2,
                retreats: 1,
                final_level: 2,
                ..Default::default()
            },
        ];

        let report = SimReport::from_runs(&SimConfig::default(), runs);
        assert_eq!(report.num_runs, 2);
        assert_eq!(report.dungeons_attempted, 8);
        assert!((report.clear_rate - 0.5).abs() < 1e-9);
        assert!((report.avg_final_level - 3.0).abs() < 1e-9);
        assert!((report.avg_captures - 1.0).abs() < 1e-9);
        assert_eq!(report.level_distribution.get(&4), Some(&1));
    }

    #[test]
    fn test_json_skips_run_stats() {
        let report = SimReport::from_runs(&SimConfig::default(), vec![RunStats::default()]);
        let json = report.to_json();
        assert!(json.contains("\"clear_rate\""));
        assert!(!json.contains("run_stats"));
    }
}
