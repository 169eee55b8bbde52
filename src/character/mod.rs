//! Users, their attributes, and the stats derived from them.

#![allow(unused_imports)]

pub mod attributes;
pub mod buffs;
pub mod stats;
pub mod user;

pub use attributes::*;
pub use buffs::*;
pub use stats::*;
pub use user::*;
