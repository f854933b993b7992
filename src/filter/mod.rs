//! Candidate filtering: exclude/include globs, dotfile rules and gitignore

pub mod gitignore;
pub mod manager;
pub mod segments;

pub use gitignore::IgnoreMatcher;
pub use manager::{FilterManager, FilterOptions, Verdict};
pub use segments::SegmentPattern;
