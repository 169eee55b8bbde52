//! The engine service and its storage and clock seams.

#![allow(unused_imports)]

pub mod clock;
pub mod engine;
pub mod store;

pub use clock::*;
pub use engine::*;
pub use store::*;
