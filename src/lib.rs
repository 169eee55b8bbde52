//! Solo Ascent - combat encounter and reward resolution engine.
//!
//! A player enters a tiered dungeon, fights three mobs and a boss in
//! workout-gated turns with up to three captured bosses at their side,
//! and walks away with XP, coins, items, captured bosses and timed
//! chests. [`service::engine::Engine`] is the entry point: it owns the
//! stores and serializes every operation per user.

pub mod character;
pub mod combat;
pub mod core;
pub mod dungeon;
pub mod items;
pub mod rewards;
pub mod service;
pub mod simulator;
pub mod utils;

pub use crate::core::config::{CaptureRule, EngineConfig};
pub use crate::core::error::{EngineError, Result};
pub use combat::encounter::{EncounterOutcome, RetreatOutcome};
pub use dungeon::tiers::Tier;
pub use service::engine::Engine;
