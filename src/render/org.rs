//! Org Mode source-block rendering.

use super::Formatter;
use std::io::{self, Write};

/// Renders `- path` followed by a `#+BEGIN_SRC` block.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrgFormatter;

impl Formatter for OrgFormatter {
    fn format(&self, path: &str, language: &str, content: &[u8]) -> io::Result<Vec<u8>> {
        let escaped = escape_org_content(content);
        let mut out = Vec::with_capacity(escaped.len() + path.len() + 32);

        writeln!(out, "- {}", path)?;
        writeln!(out, "#+BEGIN_SRC {}", language)?;
        out.write_all(&escaped)?;
        if !escaped.is_empty() && !escaped.ends_with(b"\n") {
            out.write_all(b"\n")?;
        }
        out.write_all(b"#+END_SRC\n\n")?;

        Ok(out)
    }
}

/// Prefix a comma to lines Org would otherwise parse inside the block:
/// headings (`*`), directives (`#+`) and already-escaped forms of both.
fn escape_org_content(content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len());
    for (i, line) in content.split(|&b| b == b'\n').enumerate() {
        if i > 0 {
            out.push(b'\n');
        }
        if needs_escape(line) {
            out.push(b',');
        }
        out.extend_from_slice(line);
    }
    out
}

fn needs_escape(line: &[u8]) -> bool {
    let unescaped = line.strip_prefix(b",").unwrap_or(line);
    unescaped.starts_with(b"*") || unescaped.starts_with(b"#+")
}
