mod clause;
mod engine;
mod trail;

pub use clause::ClauseRef;
pub use engine::CDCLSolver;
pub use trail::{ImplicationNode, TrailEntry};
