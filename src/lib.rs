//! Library surface of srcpack.
//!
//! The discovery pipeline is [`plan::Planner`] driving [`filter::FilterManager`];
//! [`execute::Executor`] turns the resulting plan into output.

pub mod cli;
pub mod config;
pub mod detect;
pub mod domain;
pub mod error;
pub mod execute;
pub mod filter;
pub mod output;
pub mod plan;
pub mod project;
pub mod render;
pub mod utils;

pub use domain::{Candidate, Config, PatternClass, PlannedFile};
pub use error::PackError;
