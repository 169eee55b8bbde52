//! Simulation configuration.

use crate::dungeon::tiers::Tier;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulated heroes
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Tier every dungeon is entered at
    pub tier: Tier,

    /// Dungeons each hero attempts
    pub dungeons_per_run: u32,

    /// Engine calls allowed per dungeon before the hero runs away
    pub max_actions_per_dungeon: u32,

    /// Log verbosity (0 = silent, 1 = summary, 2 = detailed)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            tier: Tier::E,
            dungeons_per_run: 10,
            max_actions_per_dungeon: 500,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Small seeded config for quick checks.
    pub fn quick(tier: Tier, seed: u64) -> Self {
        Self {
            num_runs: 20,
            seed: Some(seed),
            tier,
            dungeons_per_run: 5,
            ..Default::default()
        }
    }
}
