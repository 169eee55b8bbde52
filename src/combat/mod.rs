//! Turn-based encounters and the party that fights alongside the player.

#![allow(unused_imports)]

pub mod encounter;
pub mod party;
pub mod session;

pub use encounter::*;
pub use party::*;
pub use session::*;
