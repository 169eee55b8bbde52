//! Dungeon tiers, enemies, and daily clear tracking.

#![allow(unused_imports)]

pub mod enemy;
pub mod progress;
pub mod tiers;

pub use enemy::*;
pub use progress::*;
pub use tiers::*;
