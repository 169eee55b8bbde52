//! Item system: types, the catalog, equipment, loot rolls, and inventory actions.

#![allow(unused_imports)]

pub mod catalog;
pub mod equipment;
pub mod inventory;
pub mod loot;
pub mod types;

pub use catalog::*;
pub use equipment::*;
pub use inventory::*;
pub use loot::*;
pub use types::*;
