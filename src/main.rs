//! srcpack: pack source files into a single LLM-friendly context document
//!
//! Targets (paths, directories, globs) are expanded, filtered through exclude
//! patterns, dotfile rules and each repository's ignore rules, then written
//! as Markdown or Org source blocks.

use anyhow::Result;

fn main() -> Result<()> {
    srcpack::cli::run()
}
