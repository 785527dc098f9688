//! Random rolls: the injectable roller, dice notation and stat generation

mod notation;
mod roller;
mod rolls;

#[cfg(test)]
mod property_tests;

pub use notation::*;
pub use roller::*;
pub use rolls::*;
