//! Timed status effects attached to a combatant

mod effect;
mod tracker;


pub use effect::*;
pub use tracker::*;
