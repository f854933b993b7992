//! System clipboard output via the platform's clipboard command.

use super::Sink;
use std::io::{self, Write};
use std::process::{Command, Stdio};

/// Clipboard programs tried in order; the first one that runs wins.
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("clip", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

type CopyFn = Box<dyn FnMut(&[u8]) -> io::Result<()> + Send>;

/// Buffers everything written and hands it to the clipboard on `finish`.
pub struct ClipboardSink {
    buf: Vec<u8>,
    copy: CopyFn,
}

impl ClipboardSink {
    pub fn new() -> Self {
        Self::with_copier(Box::new(copy_to_system_clipboard))
    }

    fn with_copier(copy: CopyFn) -> Self {
        Self { buf: Vec::new(), copy }
    }
}

impl Default for ClipboardSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for ClipboardSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for ClipboardSink {
    fn finish(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        (self.copy)(&self.buf).map_err(|e| {
            io::Error::new(e.kind(), format!("failed to copy buffered output to clipboard: {}", e))
        })?;
        self.buf.clear();
        Ok(())
    }
}

fn copy_to_system_clipboard(text: &[u8]) -> io::Result<()> {
    let mut tried = Vec::new();
    for (program, args) in CLIPBOARD_COMMANDS {
        match run_copy_command(program, args, text) {
            Ok(()) => {
                tracing::debug!("copied {} bytes with {}", text.len(), program);
                return Ok(());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => tried.push(*program),
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("no clipboard utility found (tried {})", tried.join(", ")),
    ))
}

fn run_copy_command(program: &str, args: &[&str], text: &[u8]) -> io::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(text)?;
    }

    let output = child.wait_with_output()?;
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(io::Error::other(format!("{} exited with {}: {}", program, output.status, stderr.trim())))
}
