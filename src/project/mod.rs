//! Repository root discovery

pub mod root;

pub use root::{find_root, ProjectRoot};
