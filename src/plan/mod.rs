//! Target expansion and plan construction

pub mod pattern;
pub mod planner;

pub use pattern::{prepare_pattern, TargetPattern};
pub use planner::Planner;
