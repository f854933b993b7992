//! Sequential read-format-write over a finished plan.

use crate::domain::PlannedFile;
use crate::error::PackError;
use crate::render::Formatter;
use std::fs;
use std::io::Write;

pub struct Executor<'a> {
    formatter: &'a dyn Formatter,
    output: &'a mut dyn Write,
}

impl<'a> Executor<'a> {
    pub fn new(formatter: &'a dyn Formatter, output: &'a mut dyn Write) -> Self {
        Self { formatter, output }
    }

    /// Format every planned file in order and write it to the output.
    ///
    /// Unreadable files are skipped with a warning. A formatting or write
    /// failure stops the run; output written so far is left in place.
    pub fn execute(&mut self, plan: &[PlannedFile]) -> Result<usize, PackError> {
        let mut written = 0;
        for file in plan {
            let content = match fs::read(&file.absolute) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("skipping file {}: {}", file.path, e);
                    continue;
                }
            };

            let block = self
                .formatter
                .format(&file.path, &file.language, &content)
                .map_err(|source| PackError::Format { path: file.path.clone(), source })?;

            self.output
                .write_all(&block)
                .map_err(|source| PackError::Write { path: file.path.clone(), source })?;
            written += 1;
        }
        Ok(written)
    }
}
