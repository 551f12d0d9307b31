//! Value storage and the recompute engine.
pub mod evaluator;
pub mod trace;
pub mod values;

pub use evaluator::Evaluator;
pub use trace::format_trace;
pub use values::{Snapshot, ValueMap};
