//! Output destinations: stdout, files, the clipboard, or several at once.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub mod clipboard;

pub use clipboard::ClipboardSink;

/// An append-only destination that may need a final step once all output
/// has been written (flushing a file, handing text to the clipboard).
pub trait Sink: Write + Send {
    fn finish(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl<W: Write + Send> Sink for BufWriter<W> {}

impl Sink for io::Stdout {}

impl Sink for Vec<u8> {}

/// Forwards every write to each member sink.
///
/// All members receive every write even when one fails; failures are
/// reported together as a single error.
#[derive(Default)]
pub struct FanOut {
    sinks: Vec<(String, Box<dyn Sink>)>,
}

impl FanOut {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, sink: Box<dyn Sink>) {
        self.sinks.push((name.into(), sink));
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn for_each(&mut self, mut op: impl FnMut(&mut dyn Sink) -> io::Result<()>) -> io::Result<()> {
        let mut failures = Vec::new();
        for (name, sink) in &mut self.sinks {
            if let Err(e) = op(sink.as_mut()) {
                failures.push(format!("{}: {}", name, e));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(io::Error::other(failures.join("; ")))
        }
    }
}

impl Write for FanOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.for_each(|sink| sink.write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.for_each(|sink| sink.flush())
    }
}

impl Sink for FanOut {
    fn finish(&mut self) -> io::Result<()> {
        self.for_each(|sink| sink.finish())
    }
}

/// Build the output destination for a run: the file and/or the clipboard
/// when requested, stdout otherwise.
pub fn open_sinks(output_file: Option<&Path>, to_clipboard: bool) -> Result<FanOut> {
    let mut fan_out = FanOut::new();

    if let Some(path) = output_file {
        let file = File::create(path).with_context(|| {
            format!("failed to create output file {:?}", path.display().to_string())
        })?;
        fan_out.push(path.display().to_string(), Box::new(BufWriter::new(file)));
    }

    if to_clipboard {
        fan_out.push("clipboard", Box::new(ClipboardSink::new()));
    }

    if fan_out.is_empty() {
        fan_out.push("stdout", Box::new(io::stdout()));
    }

    Ok(fan_out)
}
