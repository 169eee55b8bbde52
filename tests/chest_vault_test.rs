//! Timed chest lifecycle through the engine.

use solo_ascent::core::constants::{DEBUG_CHEST_OPEN_MS, HOUR_MS};
use solo_ascent::rewards::chest::{ChestSource, ChestStatus};
use solo_ascent::service::clock::ManualClock;
use solo_ascent::{Engine, EngineConfig, EngineError, Tier};
use std::sync::Arc;
use std::thread;

const START: i64 = 1_704_067_200_000;

fn create_engine() -> (Arc<Engine>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START));
    let engine = Engine::with_clock(EngineConfig::deterministic(99), clock.clone());
    (Arc::new(engine), clock)
}

#[test]
fn test_debug_chest_lifecycle() {
    let (engine, clock) = create_engine();
    let user = engine.create_user("looter").unwrap();
    let chest = engine
        .mint_chest(&user.id, Tier::C, ChestSource::Debug)
        .unwrap();
    assert_eq!(chest.open_duration_ms, DEBUG_CHEST_OPEN_MS);

    assert!(matches!(
        engine.try_open(&user.id, &chest.id),
        Err(EngineError::ChestNotStarted)
    ));
    assert_eq!(
        engine.start_opening(&user.id, &chest.id).unwrap(),
        ChestStatus::Opening {
            remaining_ms: DEBUG_CHEST_OPEN_MS
        }
    );
    assert!(matches!(
        engine.start_opening(&user.id, &chest.id),
        Err(EngineError::AlreadyInProgress)
    ));

    clock.advance(DEBUG_CHEST_OPEN_MS - 1);
    assert!(matches!(
        engine.try_open(&user.id, &chest.id),
        Err(EngineError::NotReady { remaining_ms: 1 })
    ));
    // Polling is harmless
    assert!(engine.try_open(&user.id, &chest.id).is_err());

    clock.advance(1);
    let before = engine.user(&user.id).unwrap();
    let grant = engine.try_open(&user.id, &chest.id).unwrap();
    let after = engine.user(&user.id).unwrap();
    assert_eq!(grant.coins, chest.contents.coins);
    assert_eq!(grant.items, chest.contents.items);
    assert_eq!(after.coins, before.coins + grant.coins);
    assert_eq!(
        after.inventory.items.len(),
        before.inventory.items.len() + grant.items.len()
    );
    // C tier: 1 + 2/2 items
    assert!(grant.items.len() <= 2);

    assert!(matches!(
        engine.try_open(&user.id, &chest.id),
        Err(EngineError::ChestNotFound(_))
    ));
}

#[test]
fn test_daily_task_chest_durations_scale_with_tier() {
    let (engine, _) = create_engine();
    let user = engine.create_user("looter").unwrap();
    let expected = [
        (Tier::E, HOUR_MS),
        (Tier::D, 2 * HOUR_MS),
        (Tier::C, 4 * HOUR_MS),
        (Tier::B, 8 * HOUR_MS),
        (Tier::A, 12 * HOUR_MS),
        (Tier::S, 24 * HOUR_MS),
    ];
    for (tier, duration) in expected {
        let chest = engine
            .mint_chest(&user.id, tier, ChestSource::DailyTask)
            .unwrap();
        assert_eq!(chest.open_duration_ms, duration, "tier {tier}");
    }
    assert_eq!(engine.user(&user.id).unwrap().chests.len(), 6);
}

#[test]
fn test_unknown_chest() {
    let (engine, _) = create_engine();
    let user = engine.create_user("looter").unwrap();
    let err = engine.start_opening(&user.id, "missing").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_racing_opens_grant_once() {
    let (engine, clock) = create_engine();
    let user = engine.create_user("looter").unwrap();
    let chest = engine
        .mint_chest(&user.id, Tier::E, ChestSource::Debug)
        .unwrap();
    engine.start_opening(&user.id, &chest.id).unwrap();
    clock.advance(DEBUG_CHEST_OPEN_MS);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let user_id = user.id.clone();
            let chest_id = chest.id.clone();
            thread::spawn(move || engine.try_open(&user_id, &chest_id))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, EngineError::ChestNotFound(_))));
    let user = engine.user(&user.id).unwrap();
    assert_eq!(user.coins, 1000 + chest.contents.coins);
}
