//! Core data types shared across planning, filtering and execution.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

pub const DEFAULT_FORMAT: &str = "markdown";

/// Where a candidate path came from.
///
/// `Include` candidates were produced by a force-include pattern and bypass
/// dotfile hiding and ignore rules. Exclude patterns still apply to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternClass {
    Include,
    Ordinary,
}

impl PatternClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternClass::Include => "include",
            PatternClass::Ordinary => "ordinary",
        }
    }
}

/// A file produced by expanding one target pattern, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute filesystem path
    pub absolute: PathBuf,
    /// Path as the user should see it (relative when the target was relative)
    pub display: String,
    pub class: PatternClass,
}

/// A file that survived every filter and will be read and formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    /// Display path, also the sort key of the plan
    pub path: String,
    pub absolute: PathBuf,
    pub language: String,
}

/// Values loaded from config files and the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(deserialize_with = "string_or_list")]
    pub exclude: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub include: Vec<String>,
    pub no_ignore: bool,
    pub hidden: bool,
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            include: Vec::new(),
            no_ignore: false,
            hidden: false,
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

/// Accept either a list of strings or one comma-separated string.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    let values = match Raw::deserialize(deserializer)? {
        Raw::One(s) => s.split(',').map(str::to_string).collect::<Vec<_>>(),
        Raw::Many(list) => list,
    };

    Ok(values.into_iter().map(|v| v.trim().to_string()).filter(|v| !v.is_empty()).collect())
}
