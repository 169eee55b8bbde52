//! End-to-end encounters driven through the engine.

use solo_ascent::character::attributes::Attributes;
use solo_ascent::combat::encounter::EncounterOutcome;
use solo_ascent::combat::session::{EncounterKind, SessionPhase};
use solo_ascent::rewards::chest::{ChestSource, ChestStatus};
use solo_ascent::rewards::resolver::{BattleResult, RewardOutcome};
use solo_ascent::service::clock::ManualClock;
use solo_ascent::{Engine, EngineConfig, EngineError, Tier};
use std::sync::Arc;

const START: i64 = 1_704_067_200_000;

fn create_engine(seed: u64) -> Engine {
    Engine::with_clock(
        EngineConfig::deterministic(seed),
        Arc::new(ManualClock::new(START)),
    )
}

/// A user whose strength one-shots anything below tier A.
fn create_strong_user(engine: &Engine) -> String {
    let mut user = engine.create_user("striker").unwrap();
    user.attributes = Attributes::from_values(60, 20, 20, 20, 20);
    let id = user.id.clone();
    engine.insert_user(user).unwrap();
    id
}

/// Kills the current enemy with a single confirmed workout.
fn strike(engine: &Engine, user_id: &str) -> EncounterOutcome {
    let declared = engine.attack(user_id).unwrap();
    let session = declared.session().unwrap();
    assert!(session.workout_prompt().is_some());
    engine.confirm_workout(user_id).unwrap()
}

fn clear_dungeon(engine: &Engine, user_id: &str, tier: Tier) -> RewardOutcome {
    engine.enter_dungeon(user_id, tier).unwrap();
    for index in 1..=3u8 {
        let outcome = strike(engine, user_id);
        let session = outcome.session().unwrap();
        assert_eq!(session.phase, SessionPhase::EnemyDefeated);
        assert_eq!(session.enemy_index, index);
        engine.next_enemy(user_id).unwrap();
    }
    match strike(engine, user_id) {
        EncounterOutcome::Resolved(outcome) => outcome,
        EncounterOutcome::Ongoing(session) => panic!("boss survived: {:?}", session.phase),
    }
}

#[test]
fn test_first_clear_pays_bonus_then_base() {
    let engine = create_engine(1);
    let user_id = create_strong_user(&engine);

    let first = clear_dungeon(&engine, &user_id, Tier::E);
    assert_eq!(first.result, BattleResult::Victory);
    assert_eq!(first.kind, EncounterKind::StandardDungeon);
    assert!(first.rewards.first_clear);
    assert_eq!(first.rewards.xp, 37);
    assert_eq!(first.rewards.coins, 22);
    assert_eq!(first.rewards.kill_loot.kills, 4);
    assert_eq!(first.captured.as_ref().unwrap().name, "Goblin King");
    assert_eq!(first.chests.len(), 1);
    assert_eq!(first.chests[0].source, ChestSource::DungeonClear);

    let user = engine.user(&user_id).unwrap();
    assert_eq!(user.coins, 1000 + 22 + first.rewards.kill_loot.coins);
    assert_eq!(user.xp, 37);
    assert_eq!(user.captured_bosses.len(), 1);
    assert!(user.dungeon_progress.is_completed_today(Tier::E));
    assert_eq!(engine.session(&user_id).unwrap(), None);

    let second = clear_dungeon(&engine, &user_id, Tier::E);
    assert!(!second.rewards.first_clear);
    assert_eq!(second.rewards.xp, 25);
    assert_eq!(second.rewards.coins, 15);
    let user = engine.user(&user_id).unwrap();
    assert_eq!(user.dungeon_progress.total_clears(Tier::E), 2);
    assert_eq!(user.dungeon_progress.completed_today, vec![Tier::E]);
}

#[test]
fn test_dungeon_clear_chest_opens_without_waiting() {
    let engine = create_engine(2);
    let user_id = create_strong_user(&engine);
    let outcome = clear_dungeon(&engine, &user_id, Tier::E);
    let chest_id = &outcome.chests[0].id;

    assert_eq!(
        engine.chest_status(&user_id, chest_id).unwrap(),
        ChestStatus::Idle
    );
    assert_eq!(
        engine.start_opening(&user_id, chest_id).unwrap(),
        ChestStatus::Openable
    );
    let grant = engine.try_open(&user_id, chest_id).unwrap();
    assert_eq!(grant.xp, 25);
    assert!((30..=45).contains(&grant.coins));
}

#[test]
fn test_daily_reset_restores_first_clear() {
    let clock = Arc::new(ManualClock::new(START));
    let engine = Engine::with_clock(EngineConfig::deterministic(3), clock.clone());
    let user_id = create_strong_user(&engine);

    clear_dungeon(&engine, &user_id, Tier::E);
    assert!(!engine.daily_reset(&user_id).unwrap());

    clock.advance(24 * 60 * 60 * 1000);
    assert!(engine.daily_reset(&user_id).unwrap());
    assert!(clear_dungeon(&engine, &user_id, Tier::E).rewards.first_clear);
}

#[test]
fn test_defeat_ends_the_run_without_rewards() {
    let engine = create_engine(4);
    let mut user = engine.create_user("fragile").unwrap();
    // 5 max HP: any enemy hit is lethal
    user.attributes = Attributes::from_values(1, 20, 1, 20, 20);
    let user_id = user.id.clone();
    engine.insert_user(user).unwrap();

    engine.enter_dungeon(&user_id, Tier::E).unwrap();
    assert_eq!(engine.user(&user_id).unwrap().hp, 5);
    let after_hit = strike(&engine, &user_id);
    assert_eq!(after_hit.session().unwrap().phase, SessionPhase::EnemyTurn);

    let outcome = engine.enemy_turn(&user_id).unwrap();
    let outcome = outcome.outcome().unwrap();
    assert_eq!(outcome.result, BattleResult::Defeat);
    assert!(outcome.damage.as_ref().unwrap().player >= 10);
    assert!(outcome.chests.is_empty());

    let user = engine.user(&user_id).unwrap();
    assert_eq!(user.hp, 0);
    assert_eq!(user.coins, 1000);
    assert!(!user.dungeon_progress.is_completed_today(Tier::E));
    assert_eq!(engine.session(&user_id).unwrap(), None);
}

#[test]
fn test_summoned_boss_is_always_captured() {
    let engine = create_engine(5);
    let user_id = create_strong_user(&engine);

    let session = engine.summon_boss(&user_id, Tier::D).unwrap();
    assert!(session.is_boss_fight());
    assert_eq!(session.enemy.name, "Orc Chieftain");

    let outcome = strike(&engine, &user_id);
    let outcome = outcome.outcome().unwrap();
    assert_eq!(outcome.kind, EncounterKind::SummonedBossFight);
    assert_eq!(outcome.rewards.xp, 250);
    assert_eq!(outcome.rewards.coins, 130);
    assert_eq!(outcome.rewards.levels_gained, 1);
    assert!(outcome.chests.is_empty());

    let user = engine.user(&user_id).unwrap();
    assert_eq!(user.level, 2);
    assert_eq!(user.xp, 150);
    assert_eq!(user.captured_bosses[0].name, "Orc Chieftain");
    assert!(!user.dungeon_progress.is_completed_today(Tier::D));
}

#[test]
fn test_run_away_keeps_kill_loot() {
    let engine = create_engine(6);
    let user_id = create_strong_user(&engine);
    engine.enter_dungeon(&user_id, Tier::E).unwrap();
    strike(&engine, &user_id);

    let retreat = engine.run_away(&user_id).unwrap();
    assert_eq!(retreat.enemy_index, 1);
    assert_eq!(retreat.loot.kills, 1);
    let user = engine.user(&user_id).unwrap();
    assert_eq!(user.coins, 1000 + retreat.loot.coins);
    assert_eq!(engine.session(&user_id).unwrap(), None);
}

#[test]
fn test_out_of_order_calls_are_rejected() {
    let engine = create_engine(7);
    let user_id = create_strong_user(&engine);
    let session = engine.enter_dungeon(&user_id, Tier::E).unwrap();

    for result in [
        engine.next_enemy(&user_id),
        engine.enemy_turn(&user_id),
        engine.confirm_workout(&user_id),
        engine.cancel_workout(&user_id),
    ] {
        assert!(matches!(result, Err(EngineError::InvalidTransition { .. })));
    }
    assert_eq!(engine.session(&user_id).unwrap(), Some(session));

    engine.attack(&user_id).unwrap();
    assert!(matches!(
        engine.attack(&user_id),
        Err(EngineError::InvalidTransition { .. })
    ));
    let back = engine.cancel_workout(&user_id).unwrap();
    assert_eq!(back.session().unwrap().phase, SessionPhase::PlayerTurn);
}

#[test]
fn test_locked_tier_is_refused() {
    let engine = create_engine(8);
    let user = engine.create_user("novice").unwrap();
    let err = engine.enter_dungeon(&user.id, Tier::B).unwrap_err();
    assert!(matches!(
        err,
        EngineError::TierLocked {
            tier: Tier::B,
            required: 30,
            actual: 20
        }
    ));
    assert_eq!(engine.session(&user.id).unwrap(), None);
}
