//! Output rendering (Markdown, Org)

use crate::error::PackError;
use std::io;

pub mod markdown;
pub mod org;

pub use markdown::MarkdownFormatter;
pub use org::OrgFormatter;

/// Turns one file into a self-contained block of output.
pub trait Formatter: Send + Sync {
    fn format(&self, path: &str, language: &str, content: &[u8]) -> io::Result<Vec<u8>>;
}

/// Formatter for a `--format` name.
pub fn formatter_for(name: &str) -> Result<Box<dyn Formatter>, PackError> {
    match name {
        "markdown" | "md" => Ok(Box::new(MarkdownFormatter)),
        "org" => Ok(Box::new(OrgFormatter)),
        other => Err(PackError::UnknownFormat(other.to_string())),
    }
}
