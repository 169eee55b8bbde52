//! Engine tunables. Everything here is configuration rather than fixed
//! game data, and loads from JSON with per-field defaults.

use super::constants::{CHEST_OPEN_DURATIONS_MS, DEBUG_CHEST_OPEN_MS, SESSION_IDLE_TIMEOUT_MS};
use super::error::ConfigError;
use crate::dungeon::tiers::Tier;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How the boss-capture percentage is decided after a dungeon clear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CaptureRule {
    Fixed {
        percent: f64,
    },
    IntelligenceScaled {
        base_percent: f64,
        percent_per_int: f64,
        max_percent: f64,
    },
}

impl Default for CaptureRule {
    fn default() -> Self {
        CaptureRule::Fixed { percent: 100.0 }
    }
}

impl CaptureRule {
    pub fn percent(&self, intelligence: u32) -> f64 {
        match *self {
            CaptureRule::Fixed { percent } => percent,
            CaptureRule::IntelligenceScaled {
                base_percent,
                percent_per_int,
                max_percent,
            } => (base_percent + percent_per_int * intelligence as f64).min(max_percent),
        }
    }

    /// One-shot capture roll.
    pub fn roll(&self, intelligence: u32, rng: &mut impl Rng) -> bool {
        rng.gen::<f64>() * 100.0 < self.percent(intelligence)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the engine RNG; entropy when absent
    pub seed: Option<u64>,
    pub capture_rule: CaptureRule,
    /// Chance of the single item drop on a dungeon clear
    pub clear_drop_chance: f64,
    pub kill_drop_chance: f64,
    pub kill_item_chance: f64,
    pub first_clear_multiplier: f64,
    /// Open durations indexed by tier level
    pub chest_open_durations_ms: [i64; 6],
    pub debug_chest_open_ms: i64,
    pub summoned_boss_xp_base: u64,
    pub summoned_boss_xp_per_tier: u64,
    pub summoned_boss_coins_base: u64,
    pub summoned_boss_coins_per_tier: u64,
    pub session_idle_timeout_ms: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            capture_rule: CaptureRule::default(),
            clear_drop_chance: 0.3,
            kill_drop_chance: 0.6,
            kill_item_chance: 0.3,
            first_clear_multiplier: 1.5,
            chest_open_durations_ms: CHEST_OPEN_DURATIONS_MS,
            debug_chest_open_ms: DEBUG_CHEST_OPEN_MS,
            summoned_boss_xp_base: 200,
            summoned_boss_xp_per_tier: 50,
            summoned_boss_coins_base: 100,
            summoned_boss_coins_per_tier: 30,
            session_idle_timeout_ms: SESSION_IDLE_TIMEOUT_MS,
        }
    }
}

impl EngineConfig {
    /// Defaults with a fixed seed.
    pub fn deterministic(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, chance) in [
            ("clear_drop_chance", self.clear_drop_chance),
            ("kill_drop_chance", self.kill_drop_chance),
            ("kill_item_chance", self.kill_item_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within 0..=1, got {chance}"
                )));
            }
        }
        if self.first_clear_multiplier < 1.0 {
            return Err(ConfigError::Invalid(
                "first_clear_multiplier must be at least 1".to_string(),
            ));
        }
        if self.chest_open_durations_ms.iter().any(|d| *d < 0) || self.debug_chest_open_ms < 0 {
            return Err(ConfigError::Invalid(
                "chest durations must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn chest_open_duration_ms(&self, tier: Tier) -> i64 {
        self.chest_open_durations_ms[tier.level() as usize]
    }

    pub fn summoned_boss_rewards(&self, tier: Tier) -> (u64, u64) {
        let level = tier.level() as u64;
        (
            self.summoned_boss_xp_base + self.summoned_boss_xp_per_tier * level,
            self.summoned_boss_coins_base + self.summoned_boss_coins_per_tier * level,
        )
    }

    /// Applies the first-clear bonus to a base reward, flooring.
    pub fn first_clear_amount(&self, base: u64, first_clear: bool) -> u64 {
        if first_clear {
            (base as f64 * self.first_clear_multiplier).floor() as u64
        } else {
            base
        }
    }
}
