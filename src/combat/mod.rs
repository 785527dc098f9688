//! Boss Rush: turn-based combat against a roster of bosses

mod boss;
mod combatant;
mod engine;
mod simulate;

#[cfg(test)]
mod property_tests;

pub use boss::*;
pub use combatant::*;
pub use engine::*;
pub use simulate::*;
