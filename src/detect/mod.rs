//! Language and binary classification of planned files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

pub mod binary;
pub mod language;

pub use binary::looks_binary;
pub use language::LanguageTable;

/// Number of leading bytes inspected when classifying a file.
pub const SAMPLE_SIZE: usize = 8192;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub language: String,
    pub is_binary: bool,
}

/// Classify a file from its path and, optionally, a leading content sample.
pub trait Classifier: Send + Sync {
    fn classify(&self, path: &Path, sample: Option<&[u8]>) -> Classification;
}

/// Default classifier: file-name table, then shebang, then `text`.
#[derive(Debug, Clone, Default)]
pub struct ContentDetector {
    languages: LanguageTable,
}

impl ContentDetector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Classifier for ContentDetector {
    fn classify(&self, path: &Path, sample: Option<&[u8]>) -> Classification {
        let is_binary = sample.map(looks_binary).unwrap_or(false);
        let language = self
            .languages
            .by_name(path)
            .or_else(|| sample.filter(|_| !is_binary).and_then(|s| self.languages.by_shebang(s)))
            .unwrap_or(language::FALLBACK_LANGUAGE)
            .to_string();
        Classification { language, is_binary }
    }
}

/// Read up to `limit` leading bytes of a file.
pub fn read_sample(path: &Path, limit: usize) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut sample = Vec::with_capacity(limit.min(SAMPLE_SIZE));
    file.take(limit as u64).read_to_end(&mut sample)?;
    Ok(sample)
}
