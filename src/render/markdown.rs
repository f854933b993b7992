//! Markdown code-block rendering.

use super::Formatter;
use std::io::{self, Write};

const MIN_FENCE: usize = 3;

/// Renders `- path` followed by a fenced code block.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn format(&self, path: &str, language: &str, content: &[u8]) -> io::Result<Vec<u8>> {
        let fence = "`".repeat(fence_len(content));
        let mut out = Vec::with_capacity(content.len() + path.len() + 32);

        writeln!(out, "- {}", path)?;
        writeln!(out, "{}{}", fence, language)?;
        out.write_all(content)?;
        if !content.is_empty() && !content.ends_with(b"\n") {
            out.write_all(b"\n")?;
        }
        write!(out, "{}\n\n", fence)?;

        Ok(out)
    }
}

/// One backtick longer than the longest run opening a content line, so the
/// content can never close the block early.
fn fence_len(content: &[u8]) -> usize {
    content
        .split(|&b| b == b'\n')
        .map(|line| {
            let trimmed = line.iter().skip_while(|&&b| b == b' ' || b == b'\t');
            trimmed.take_while(|&&b| b == b'`').count()
        })
        .filter(|&run| run >= MIN_FENCE)
        .map(|run| run + 1)
        .max()
        .unwrap_or(MIN_FENCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn render(path: &str, language: &str, content: &str) -> String {
        let bytes = MarkdownFormatter.format(path, language, content.as_bytes()).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_markdown_block() {
        assert_eq!(
            render("src/main.go", "go", "package main\n"),
            "- src/main.go\n```go\npackage main\n```\n\n"
        );
    }

    #[test]
    fn test_missing_trailing_newline_is_added() {
        assert_eq!(render("a.py", "python", "print(1)"), "- a.py\n```python\nprint(1)\n```\n\n");
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(render("empty.txt", "text", ""), "- empty.txt\n```text\n```\n\n");
    }

    #[test]
    fn test_fence_grows_past_embedded_fences() {
        let content = "# Title\n```rust\nfn main() {}\n```\n";
        assert_eq!(
            render("README.md", "markdown", content),
            "- README.md\n````markdown\n# Title\n```rust\nfn main() {}\n```\n````\n\n"
        );
    }
}
