//! Path normalization

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

pub fn normalize_path(path: &str) -> String {
    // Convert backslashes to forward slashes and normalize
    path.replace('\\', "/")
}

/// Expand a leading `~` or `~/` to the current user's home directory.
///
/// `~user` forms are left untouched.
pub fn expand_tilde(pattern: &str) -> Result<String> {
    let rest = match pattern.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return Ok(pattern.to_string()),
    };

    let home = dirs::home_dir().context("could not determine home directory to expand '~'")?;
    let home = normalize_path(&home.to_string_lossy());
    Ok(format!("{}{}", home.trim_end_matches('/'), rest))
}

/// Drop `.` segments and duplicate separators from a slash-separated path,
/// keeping a leading `/` and any `..` segments.
pub fn clean_display(path: &str) -> String {
    let cleaned =
        path.split('/').filter(|seg| !seg.is_empty() && *seg != ".").collect::<Vec<_>>().join("/");
    if path.starts_with('/') {
        format!("/{}", cleaned)
    } else if cleaned.is_empty() {
        ".".to_string()
    } else {
        cleaned
    }
}

/// Resolve `path` against `base` and fold `.`/`..` components lexically.
///
/// Symlinks are not resolved and the path need not exist.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() { path.to_path_buf() } else { base.join(path) };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
