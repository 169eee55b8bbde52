//! Drives heroes through dungeons with the real engine.
//!
//! Every workout is confirmed immediately and every dungeon-clear chest is
//! opened on the spot. The clock only moves when the runner moves it.

use super::config::SimConfig;
use super::report::{RunStats, SimReport};
use crate::character::attributes::AttributeType;
use crate::character::user::User;
use crate::combat::encounter::EncounterOutcome;
use crate::combat::session::SessionPhase;
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::rewards::resolver::RewardOutcome;
use crate::service::clock::{Clock, ManualClock};
use crate::service::engine::Engine;
use std::sync::Arc;
use tracing::debug;

// 2024-01-01T00:00:00Z
const SIM_START_MS: i64 = 1_704_067_200_000;
const ACTION_STEP_MS: i64 = 1_000;

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> Result<SimReport> {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let seed = config.seed.map(|seed| seed.wrapping_add(run_idx as u64));
        let run = simulate_single_run(config, seed)?;

        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Level {}, Clears {}, Defeats {}, Retreats {}, Captures {}",
                run_idx + 1,
                config.num_runs,
                run.final_level,
                run.clears,
                run.defeats,
                run.retreats,
                run.captures
            );
        }
        all_runs.push(run);
    }

    Ok(SimReport::from_runs(config, all_runs))
}

/// One hero, `dungeons_per_run` attempts at the configured tier.
pub fn simulate_single_run(config: &SimConfig, seed: Option<u64>) -> Result<RunStats> {
    let clock = Arc::new(ManualClock::new(SIM_START_MS));
    let engine = Engine::with_clock(
        EngineConfig {
            seed,
            ..EngineConfig::default()
        },
        clock.clone(),
    );

    // Locked tiers are still simulated: the hero gets just enough perception
    let mut hero = User::new("simulated hero", clock.now_ms());
    let gate = config.tier.config().perception_gate;
    if hero.attributes.perception() < gate {
        hero.attributes.set(AttributeType::Perception, gate);
    }
    let user_id = hero.id.clone();
    engine.insert_user(hero)?;

    let mut stats = RunStats::default();
    for _ in 0..config.dungeons_per_run {
        run_dungeon(&engine, &clock, &user_id, config, &mut stats)?;
        clock.advance(ACTION_STEP_MS);
    }

    let user = engine.user(&user_id)?;
    stats.final_level = user.level;
    stats.final_coins = user.coins;
    stats.captures = user.captured_bosses.len() as u32;
    Ok(stats)
}

fn run_dungeon(
    engine: &Engine,
    clock: &ManualClock,
    user_id: &str,
    config: &SimConfig,
    stats: &mut RunStats,
) -> Result<()> {
    let mut session = engine.enter_dungeon(user_id, config.tier)?;

    for _ in 0..config.max_actions_per_dungeon {
        clock.advance(ACTION_STEP_MS);
        let outcome = match &session.phase {
            SessionPhase::PlayerTurn => engine.attack(user_id)?,
            SessionPhase::AwaitingWorkout { .. } => engine.confirm_workout(user_id)?,
            SessionPhase::EnemyTurn => engine.enemy_turn(user_id)?,
            SessionPhase::EnemyDefeated => engine.next_enemy(user_id)?,
        };
        match outcome {
            EncounterOutcome::Ongoing(next) => session = next,
            EncounterOutcome::Resolved(outcome) => {
                return record_outcome(engine, user_id, &outcome, stats);
            }
        }
    }

    let retreat = engine.run_away(user_id)?;
    debug!(user = %user_id, index = retreat.enemy_index, "simulated hero gave up");
    stats.retreats += 1;
    stats.coins_earned += retreat.loot.coins;
    stats.items_found += retreat.loot.items.len() as u32;
    Ok(())
}

fn record_outcome(
    engine: &Engine,
    user_id: &str,
    outcome: &RewardOutcome,
    stats: &mut RunStats,
) -> Result<()> {
    if !outcome.is_victory() {
        stats.defeats += 1;
        return Ok(());
    }

    let rewards = &outcome.rewards;
    stats.clears += 1;
    if rewards.first_clear {
        stats.first_clears += 1;
    }
    stats.xp_earned += rewards.xp;
    stats.coins_earned += rewards.coins + rewards.kill_loot.coins;
    stats.items_found += (outcome.item_drops.len() + rewards.kill_loot.items.len()) as u32;

    for chest in &outcome.chests {
        engine.start_opening(user_id, &chest.id)?;
        let grant = engine.try_open(user_id, &chest.id)?;
        stats.chests_opened += 1;
        stats.xp_earned += grant.xp;
        stats.coins_earned += grant.coins;
        stats.items_found += grant.items.len() as u32;
    }
    Ok(())
}
