//! Frame-stepped action games: Hack & Slash and Runner

mod frame;
mod hack_slash;
mod runner;


pub use frame::*;
pub use hack_slash::*;
pub use runner::*;
