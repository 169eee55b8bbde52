//! Time-gated reward chests.
//!
//! Contents are rolled once at mint time and never re-rolled. A chest goes
//! idle -> opening -> openable, and a successful open grants everything and
//! removes the chest from the user, so the grant happens at most once.

use crate::character::stats::apply_xp;
use crate::character::user::User;
use crate::core::config::EngineConfig;
use crate::core::constants::CHEST_COIN_MULTIPLIER;
use crate::core::error::{EngineError, Result};
use crate::core::ids::random_id;
use crate::dungeon::tiers::Tier;
use crate::items::loot::LootTable;
use crate::items::types::Item;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Who minted a chest. Decides its open duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestSource {
    /// Instant-open reward for clearing a dungeon
    DungeonClear,
    /// Handed out by the daily-task collaborator, tier-timed
    DailyTask,
    /// Short fixed timer for testing reward paths
    Debug,
}

impl ChestSource {
    pub fn open_duration_ms(&self, tier: Tier, config: &EngineConfig) -> i64 {
        match self {
            ChestSource::DungeonClear => 0,
            ChestSource::DailyTask => config.chest_open_duration_ms(tier),
            ChestSource::Debug => config.debug_chest_open_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestState {
    Idle,
    Opening { started_at_ms: i64 },
}

/// Lifecycle as seen at a particular instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestStatus {
    Idle,
    Opening { remaining_ms: i64 },
    Openable,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChestContents {
    pub coins: u64,
    pub xp: u64,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chest {
    pub id: String,
    pub tier: Tier,
    pub source: ChestSource,
    pub open_duration_ms: i64,
    pub contents: ChestContents,
    pub state: ChestState,
    pub created_at_ms: i64,
}

/// What a successful open handed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChestGrant {
    pub chest_id: String,
    pub tier: Tier,
    pub coins: u64,
    pub xp: u64,
    pub items: Vec<Item>,
    pub levels_gained: u32,
}

impl Chest {
    pub fn status(&self, now_ms: i64) -> ChestStatus {
        match self.state {
            ChestState::Idle => ChestStatus::Idle,
            ChestState::Opening { started_at_ms } => {
                let elapsed = now_ms - started_at_ms;
                if elapsed >= self.open_duration_ms {
                    ChestStatus::Openable
                } else {
                    ChestStatus::Opening {
                        remaining_ms: self.open_duration_ms - elapsed,
                    }
                }
            }
        }
    }

    pub fn start_opening(&mut self, now_ms: i64) -> Result<()> {
        if let ChestState::Opening { .. } = self.state {
            return Err(EngineError::AlreadyInProgress);
        }
        self.state = ChestState::Opening {
            started_at_ms: now_ms,
        };
        Ok(())
    }

    /// Read-only readiness check; safe to poll.
    pub fn check_ready(&self, now_ms: i64) -> Result<()> {
        match self.status(now_ms) {
            ChestStatus::Idle => Err(EngineError::ChestNotStarted),
            ChestStatus::Opening { remaining_ms } => Err(EngineError::NotReady { remaining_ms }),
            ChestStatus::Openable => Ok(()),
        }
    }
}

/// Coins 2x tier coins plus up to one more tier's worth, tier XP, and
/// 1 + level/2 items from the tier rarity cascade.
pub fn roll_contents(tier: Tier, table: &LootTable, rng: &mut impl Rng) -> ChestContents {
    let config = tier.config();
    let coins = CHEST_COIN_MULTIPLIER * config.base_coins + rng.gen_range(0..=config.base_coins);
    let item_count = 1 + tier.level() as usize / 2;
    let items = (0..item_count)
        .filter_map(|_| table.roll_drop(tier, rng))
        .collect();

    ChestContents {
        coins,
        xp: config.base_xp,
        items,
    }
}

/// Creates a chest with its contents already rolled.
pub fn mint(
    tier: Tier,
    source: ChestSource,
    config: &EngineConfig,
    table: &LootTable,
    now_ms: i64,
    rng: &mut impl Rng,
) -> Chest {
    let contents = roll_contents(tier, table, rng);
    Chest {
        id: random_id(rng),
        tier,
        source,
        open_duration_ms: source.open_duration_ms(tier, config),
        contents,
        state: ChestState::Idle,
        created_at_ms: now_ms,
    }
}

pub fn start_opening(user: &mut User, chest_id: &str, now_ms: i64) -> Result<ChestStatus> {
    let chest = user
        .chest_mut(chest_id)
        .ok_or_else(|| EngineError::ChestNotFound(chest_id.to_string()))?;
    chest.start_opening(now_ms)?;
    Ok(chest.status(now_ms))
}

/// Opens a ready chest: grants its contents and removes it from the user.
pub fn try_open(user: &mut User, chest_id: &str, now_ms: i64) -> Result<ChestGrant> {
    let index = user
        .chests
        .iter()
        .position(|chest| chest.id == chest_id)
        .ok_or_else(|| EngineError::ChestNotFound(chest_id.to_string()))?;
    user.chests[index].check_ready(now_ms)?;

    let chest = user.chests.remove(index);
    let ChestContents { coins, xp, items } = chest.contents;
    user.coins += coins;
    let levels_gained = apply_xp(user, xp);
    user.inventory.items.extend(items.iter().cloned());

    Ok(ChestGrant {
        chest_id: chest.id,
        tier: chest.tier,
        coins,
        xp,
        items,
        levels_gained,
    })
}
