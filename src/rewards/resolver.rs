//! End-of-encounter reward resolution.

use super::chest::{mint, Chest, ChestSource};
use crate::character::stats::{apply_xp, effective_stats_at};
use crate::character::user::User;
use crate::combat::party::{CapturedBoss, DamageReport};
use crate::combat::session::{CombatSession, EncounterKind};
use crate::core::config::EngineConfig;
use crate::core::constants::BOSS_INDEX;
use crate::core::ids::random_id;
use crate::dungeon::tiers::Tier;
use crate::items::loot::{KillLoot, KillLootRules, LootTable};
use crate::items::types::Item;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleResult {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub xp: u64,
    pub coins: u64,
    pub first_clear: bool,
    pub levels_gained: u32,
    /// Extra rolls earned by the kills made along the way
    pub kill_loot: KillLoot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardOutcome {
    pub result: BattleResult,
    pub tier: Tier,
    pub kind: EncounterKind,
    pub rewards: RewardBreakdown,
    pub captured: Option<CapturedBoss>,
    pub item_drops: Vec<Item>,
    pub chests: Vec<Chest>,
    /// The final enemy hit, on defeat
    pub damage: Option<DamageReport>,
}

impl RewardOutcome {
    pub fn is_victory(&self) -> bool {
        self.result == BattleResult::Victory
    }
}

/// Shared inputs for every resolution step.
#[derive(Debug, Clone, Copy)]
pub struct RewardContext<'a> {
    pub config: &'a EngineConfig,
    pub table: &'a LootTable,
    pub now_ms: i64,
}

impl RewardContext<'_> {
    fn kill_rules(&self) -> KillLootRules {
        KillLootRules {
            drop_chance: self.config.kill_drop_chance,
            item_chance: self.config.kill_item_chance,
        }
    }
}

/// Resolves a won session through the branch its kind calls for.
pub fn resolve_victory(
    user: &mut User,
    session: &CombatSession,
    ctx: RewardContext<'_>,
    rng: &mut impl Rng,
) -> RewardOutcome {
    match session.kind {
        EncounterKind::StandardDungeon => resolve_dungeon_clear(user, session, ctx, rng),
        EncounterKind::SummonedBossFight => resolve_summoned_boss(user, session, ctx, rng),
    }
}

/// Grants everything a full dungeon clear earns and records the clear.
pub fn resolve_dungeon_clear(
    user: &mut User,
    session: &CombatSession,
    ctx: RewardContext<'_>,
    rng: &mut impl Rng,
) -> RewardOutcome {
    let tier = session.tier;
    let tier_config = tier.config();

    let first_clear = !user.dungeon_progress.is_completed_today(tier);
    let xp = ctx.config.first_clear_amount(tier_config.base_xp, first_clear);
    let coins = ctx.config.first_clear_amount(tier_config.base_coins, first_clear);
    user.coins += coins;
    let levels_gained = apply_xp(user, xp);
    user.dungeon_progress.record_clear(tier);

    let captured = if session.enemy_index > BOSS_INDEX {
        let intelligence = effective_stats_at(user, ctx.now_ms).intelligence();
        if ctx.config.capture_rule.roll(intelligence, rng) {
            let id = random_id(rng);
            let boss = CapturedBoss::with_id(id, tier_config.boss, tier, ctx.now_ms);
            debug!(user = %user.id, boss = %boss.name, "boss captured");
            user.captured_bosses.push(boss.clone());
            Some(boss)
        } else {
            None
        }
    } else {
        None
    };

    let mut item_drops = Vec::new();
    if rng.gen::<f64>() < ctx.config.clear_drop_chance {
        if let Some(item) = ctx.table.roll_drop(tier, rng) {
            user.inventory.items.push(item.clone());
            item_drops.push(item);
        }
    }

    let chest = mint(
        tier,
        ChestSource::DungeonClear,
        ctx.config,
        ctx.table,
        ctx.now_ms,
        rng,
    );
    user.chests.push(chest.clone());

    let kill_loot = apply_kill_loot(user, session, ctx, rng);

    info!(
        user = %user.id,
        %tier,
        xp,
        coins,
        first_clear,
        captured = captured.is_some(),
        "dungeon cleared"
    );

    RewardOutcome {
        result: BattleResult::Victory,
        tier,
        kind: session.kind,
        rewards: RewardBreakdown {
            xp,
            coins,
            first_clear,
            levels_gained,
            kill_loot,
        },
        captured,
        item_drops,
        chests: vec![chest],
        damage: None,
    }
}

/// A summoned boss is always captured and pays a fixed tier-scaled purse.
/// No daily bookkeeping and no chest.
pub fn resolve_summoned_boss(
    user: &mut User,
    session: &CombatSession,
    ctx: RewardContext<'_>,
    rng: &mut impl Rng,
) -> RewardOutcome {
    let tier = session.tier;
    let (xp, coins) = ctx.config.summoned_boss_rewards(tier);
    user.coins += coins;
    let levels_gained = apply_xp(user, xp);

    let name = session.enemy.name.clone();
    let boss = CapturedBoss::with_id(random_id(rng), name, tier, ctx.now_ms);
    user.captured_bosses.push(boss.clone());
    info!(user = %user.id, %tier, boss = %boss.name, "summoned boss captured");

    RewardOutcome {
        result: BattleResult::Victory,
        tier,
        kind: session.kind,
        rewards: RewardBreakdown {
            xp,
            coins,
            first_clear: false,
            levels_gained,
            kill_loot: KillLoot::default(),
        },
        captured: Some(boss),
        item_drops: Vec::new(),
        chests: Vec::new(),
        damage: None,
    }
}

pub fn defeat_outcome(session: &CombatSession, damage: DamageReport) -> RewardOutcome {
    RewardOutcome {
        result: BattleResult::Defeat,
        tier: session.tier,
        kind: session.kind,
        rewards: RewardBreakdown::default(),
        captured: None,
        item_drops: Vec::new(),
        chests: Vec::new(),
        damage: Some(damage),
    }
}

/// Rolls loot for every kill the session made and hands it to the user.
pub fn apply_kill_loot(
    user: &mut User,
    session: &CombatSession,
    ctx: RewardContext<'_>,
    rng: &mut impl Rng,
) -> KillLoot {
    let loot = ctx
        .table
        .roll_kill_loot(session.monsters_killed, session.tier, ctx.kill_rules(), rng);
    user.coins += loot.coins;
    user.inventory.items.extend(loot.items.iter().cloned());
    loot
}
