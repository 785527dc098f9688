//! Stat model: ability scores, bonuses, build flags and difficulty scaling

mod bonus;
mod flags;
mod roster;

#[cfg(test)]
mod property_tests;

pub use bonus::*;
pub use flags::*;
pub use roster::*;
