//! `--dry-run` listing.

use crate::domain::PlannedFile;
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// Print the planned files, one `<language>  <path>` line each, with the
/// language column padded to the widest entry.
pub fn print_dry_run(w: &mut dyn Write, plan: &[PlannedFile], format: &str) -> io::Result<()> {
    if plan.is_empty() {
        writeln!(w, "[Dry Run] No files to be processed.")?;
        return Ok(());
    }

    writeln!(w, "[Dry Run] Planning to process files using the '{}' format:", format)?;

    let column = plan.iter().map(|file| file.language.width()).max().unwrap_or(0);
    for file in plan {
        let padding = column - file.language.width();
        writeln!(w, "{}{}  {}", file.language, " ".repeat(padding), file.path)?;
    }

    writeln!(w)?;
    writeln!(w, "[Dry Run] Total: {}", plan.len())?;
    Ok(())
}
