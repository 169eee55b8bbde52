//! Captured bosses fighting alongside the player and sharing enemy hits.

use solo_ascent::character::attributes::AttributeType;
use solo_ascent::combat::party::CapturedBoss;
use solo_ascent::combat::session::SessionPhase;
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

/// A weak hitter with two tier E allies, so the first D mob survives a round.
fn create_party_user(engine: &Engine) -> String {
    let mut user = engine.create_user("leader").unwrap();
    user.attributes.set(AttributeType::Strength, 1);
    for name in ["Goblin King", "Goblin King"] {
        user.captured_bosses.push(CapturedBoss::new(name, Tier::E, START));
    }
    let boss_ids: Vec<String> = user.captured_bosses.iter().map(|b| b.id.clone()).collect();
    let user_id = user.id.clone();
    engine.insert_user(user).unwrap();
    for boss_id in &boss_ids {
        engine.add_to_party(&user_id, boss_id).unwrap();
    }
    user_id
}

#[test]
fn test_allies_strike_after_the_player() {
    let engine = create_engine(21);
    let user_id = create_party_user(&engine);
    engine.enter_dungeon(&user_id, Tier::D).unwrap();
    engine.attack(&user_id).unwrap();

    let outcome = engine.confirm_workout(&user_id).unwrap();
    let session = outcome.session().unwrap();
    assert_eq!(session.phase, SessionPhase::EnemyTurn);
    let dealt = session.last_damage_dealt.unwrap();
    assert!((5..25).contains(&dealt));
    assert_eq!(session.last_ally_hits.len(), 2);
    for hit in &session.last_ally_hits {
        assert!((10..20).contains(&hit.damage));
    }
    let total: u32 = dealt + session.last_ally_hits.iter().map(|h| h.damage).sum::<u32>();
    assert_eq!(session.enemy.current_hp, 75 - total);
}

#[test]
fn test_enemy_hit_is_shared() {
    let engine = create_engine(22);
    let user_id = create_party_user(&engine);
    engine.enter_dungeon(&user_id, Tier::D).unwrap();
    engine.attack(&user_id).unwrap();
    engine.confirm_workout(&user_id).unwrap();

    let outcome = engine.enemy_turn(&user_id).unwrap();
    let session = outcome.session().unwrap();
    assert_eq!(session.phase, SessionPhase::PlayerTurn);
    let report = session.last_damage_taken.as_ref().unwrap();
    assert!((15..30).contains(&report.total));
    assert_eq!(report.player, report.total * 2 / 5);
    assert_eq!(report.allies.len(), 2);
    let allies: u32 = report.allies.iter().map(|h| h.damage).sum();
    assert_eq!(report.player + allies, report.total);

    let user = engine.user(&user_id).unwrap();
    assert_eq!(user.hp, 100 - report.player);
    for (member, hit) in user.party.iter().zip(&report.allies) {
        assert_eq!(member.hp, 100 - hit.damage);
        assert!(member.alive);
    }
}

#[test]
fn test_entering_restores_the_party() {
    let engine = create_engine(23);
    let user_id = create_party_user(&engine);
    engine.enter_dungeon(&user_id, Tier::D).unwrap();
    engine.attack(&user_id).unwrap();
    engine.confirm_workout(&user_id).unwrap();
    engine.enemy_turn(&user_id).unwrap();
    engine.run_away(&user_id).unwrap();

    engine.enter_dungeon(&user_id, Tier::D).unwrap();
    let user = engine.user(&user_id).unwrap();
    assert!(user.party.iter().all(|m| m.alive && m.hp == m.max_hp));
    assert_eq!(user.hp, user.max_hp);
}

#[test]
fn test_party_caps_at_three() {
    let engine = create_engine(24);
    let user_id = create_party_user(&engine);
    let mut user = engine.user(&user_id).unwrap();
    for name in ["Orc Chieftain", "Elder Troll"] {
        user.captured_bosses.push(CapturedBoss::new(name, Tier::D, START));
    }
    let ids: Vec<String> = user.captured_bosses[2..]
        .iter()
        .map(|b| b.id.clone())
        .collect();
    engine.insert_user(user).unwrap();

    engine.add_to_party(&user_id, &ids[0]).unwrap();
    assert!(matches!(
        engine.add_to_party(&user_id, &ids[1]),
        Err(EngineError::PartyFull)
    ));
}
