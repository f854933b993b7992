//! Utility functions

pub mod paths;

pub use paths::{absolutize, clean_display, expand_tilde, normalize_path};
