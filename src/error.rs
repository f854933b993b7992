//! Typed errors for failures callers need to tell apart.
//!
//! Everything else travels as `anyhow::Error` with context attached.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    /// A user-supplied exclude or include glob does not compile.
    #[error("invalid {kind} pattern {pattern:?}")]
    InvalidPattern {
        kind: &'static str,
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("unknown format: {0:?}. Supported formats: markdown, md, org")]
    UnknownFormat(String),

    #[error("formatting file {path}")]
    Format {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("writing to output for file {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
