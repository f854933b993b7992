//! Extra targets read from standard input.

use std::io::{self, BufRead};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinMode {
    /// NUL-separated, as produced by `find -print0`
    Nul,
    /// One path per line
    Line,
}

impl StdinMode {
    fn separator(self) -> u8 {
        match self {
            StdinMode::Nul => b'\0',
            StdinMode::Line => b'\n',
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            StdinMode::Nul => "NUL-separated",
            StdinMode::Line => "newline-separated",
        }
    }
}

/// Split `reader` into trimmed, non-empty targets.
pub fn read_targets<R: BufRead>(reader: R, mode: StdinMode) -> io::Result<Vec<String>> {
    let mut targets = Vec::new();
    for chunk in reader.split(mode.separator()) {
        let chunk = chunk?;
        let target = String::from_utf8_lossy(&chunk);
        let target = target.trim();
        if !target.is_empty() {
            targets.push(target.to_string());
        }
    }
    Ok(targets)
}
