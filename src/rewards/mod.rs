//! Victory rewards and timed chests.

#![allow(unused_imports)]

pub mod chest;
pub mod resolver;

pub use chest::*;
pub use resolver::*;
