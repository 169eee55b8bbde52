//! Constants, configuration, and the error taxonomy.

#![allow(unused_imports)]

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;

pub use config::*;
pub use constants::*;
pub use error::*;
pub use ids::*;
