//! Session handles exposed to Python
//!
//! Each session owns one engine in Rust memory; Python drives it through
//! method calls and receives plain dicts back.

mod arcade;
mod convert;
mod encounter;
mod quest;

pub use arcade::*;
pub use convert::*;
pub use encounter::*;
pub use quest::*;
