//! Per-user serialization under concurrent calls.

use solo_ascent::combat::session::SessionPhase;
use solo_ascent::service::clock::ManualClock;
use solo_ascent::{Engine, EngineConfig, EngineError, Tier};
use std::sync::{Arc, Barrier};
use std::thread;

fn create_engine() -> Arc<Engine> {
    Arc::new(Engine::with_clock(
        EngineConfig::deterministic(7),
        Arc::new(ManualClock::new(1_704_067_200_000)),
    ))
}

#[test]
fn test_concurrent_attacks_declare_once() {
    let engine = create_engine();
    let user = engine.create_user("racer").unwrap();
    engine.enter_dungeon(&user.id, Tier::E).unwrap();

    let barrier = Arc::new(Barrier::new(16));
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let barrier = Arc::clone(&barrier);
            let user_id = user.id.clone();
            thread::spawn(move || {
                barrier.wait();
                engine.attack(&user_id)
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for result in &results {
        if let Err(e) = result {
            assert!(matches!(e, EngineError::InvalidTransition { .. }), "{e}");
        }
    }
    let session = engine.session(&user.id).unwrap().unwrap();
    assert!(matches!(session.phase, SessionPhase::AwaitingWorkout { .. }));
}

#[test]
fn test_concurrent_confirms_hit_once() {
    let engine = create_engine();
    let user = engine.create_user("racer").unwrap();
    engine.enter_dungeon(&user.id, Tier::D).unwrap();
    engine.attack(&user.id).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let user_id = user.id.clone();
            thread::spawn(move || engine.confirm_workout(&user_id))
        })
        .collect();
    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(successes, 1);

    // D mob has 75 HP; a 20 STR hit deals at least 100
    let session = engine.session(&user.id).unwrap().unwrap();
    assert_eq!(session.monsters_killed, 1);
    assert_eq!(session.enemy_index, 1);
}

#[test]
fn test_users_progress_independently() {
    let engine = create_engine();
    let ids: Vec<String> = (0..8)
        .map(|i| engine.create_user(&format!("hero{i}")).unwrap().id)
        .collect();

    let handles: Vec<_> = ids
        .iter()
        .cloned()
        .map(|user_id| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                engine.enter_dungeon(&user_id, Tier::E)?;
                engine.attack(&user_id)?;
                engine.confirm_workout(&user_id)
            })
        })
        .collect();
    for handle in handles {
        let outcome = handle.join().unwrap().unwrap();
        assert_eq!(outcome.session().unwrap().phase, SessionPhase::EnemyDefeated);
    }
    for id in &ids {
        assert!(engine.session(id).unwrap().is_some());
    }
}
