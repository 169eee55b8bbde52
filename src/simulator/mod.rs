//! Monte Carlo dungeon runs through the real [`Engine`](crate::service::engine::Engine).
//!
//! Each run is a fresh hero grinding one tier for a fixed number of
//! dungeons, auto-confirming every workout. Useful for checking how
//! rewards and defeats balance out per tier.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{RunStats, SimReport};
pub use runner::{run_simulation, simulate_single_run};
