//! Configuration loading and merging
//!
//! Handles loading from config files, environment variables, and CLI arguments
//! with proper precedence (CLI > Env > File > Defaults).

pub mod loader;
pub mod merge;

pub use loader::{discover_config, load_config, CONFIG_FILE_NAMES, ENV_PREFIX};
pub use merge::{merge_cli_with_config, CliOverrides};
