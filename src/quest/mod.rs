//! Text Quest: a branching scene graph driven by skill checks

mod engine;
mod scene;


pub use engine::*;
pub use scene::*;
