//! Locate the working-tree root of the git repository enclosing a path.

use crate::utils::absolutize;
use anyhow::{Context, Result};
use git2::{ErrorCode, Repository};
use std::io;
use std::path::{Path, PathBuf};

/// The directory ignore rules are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    pub path: PathBuf,
    /// `false` when no repository was found and `path` is a fallback directory
    pub is_repository: bool,
}

/// Walk up from `path` looking for a git repository.
///
/// - Inside a repository with a working tree, returns its root.
/// - Otherwise falls back to `path` itself when it is a directory, or its
///   parent when it is a file or does not exist (glob patterns rarely do).
///
/// Only genuine I/O or repository corruption errors are returned; the absence
/// of a repository is not an error.
pub fn find_root(path: &Path) -> Result<ProjectRoot> {
    let cwd = std::env::current_dir().context("could not determine current directory")?;
    let abs = absolutize(&cwd, path);

    if let Some(start) = nearest_existing_dir(&abs) {
        match Repository::discover(&start) {
            Ok(repo) => {
                if let Some(workdir) = repo.workdir() {
                    // libgit2 reports the workdir with a trailing separator
                    let root: PathBuf = workdir.components().collect();
                    return Ok(ProjectRoot { path: root, is_repository: true });
                }
                tracing::debug!(
                    "bare repository at {}, using fallback root",
                    repo.path().display()
                );
            }
            Err(e) if e.code() == ErrorCode::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to open repository for {}", abs.display()))
            }
        }
    }

    Ok(ProjectRoot { path: fallback_root(&abs)?, is_repository: false })
}

/// Pick a sensible root directory when `path` is not inside a repository.
fn fallback_root(path: &Path) -> Result<PathBuf> {
    match path.metadata() {
        Ok(meta) if meta.is_dir() => Ok(path.to_path_buf()),
        Ok(_) => Ok(parent_or_self(path)),
        // Part of a glob pattern or otherwise missing: the parent is the best guess
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(parent_or_self(path)),
        Err(e) => Err(e).with_context(|| format!("failed to stat {}", path.display())),
    }
}

fn nearest_existing_dir(path: &Path) -> Option<PathBuf> {
    path.ancestors().find(|p| p.is_dir()).map(Path::to_path_buf)
}

fn parent_or_self(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_else(|| path.to_path_buf())
}
