//! d20 skill checks against a difficulty class

mod resolver;


pub use resolver::*;
