//! Per-repository ignore rules.

use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::Match;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const GITIGNORE: &str = ".gitignore";

/// Rules from one ignore file, scoped to the directory that holds it.
struct IgnoreLayer {
    /// Directory of the ignore file, as components relative to the repository root
    dir: Vec<String>,
    rules: Gitignore,
}

/// Compiled ignore rules of one repository.
///
/// Immutable once built, so it can be shared across planner workers.
pub struct IgnoreMatcher {
    root: PathBuf,
    /// Root layer first; every layer appears after all of its ancestors
    layers: Vec<IgnoreLayer>,
}

impl IgnoreMatcher {
    /// Read `.git/info/exclude`, `.gitignore` and nested `.gitignore` files
    /// under `root`. Missing files are not an error.
    pub fn build(root: &Path) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        for source in [root.join(".git").join("info").join("exclude"), root.join(GITIGNORE)] {
            add_rule_file(&mut builder, &source);
        }
        // The metadata directory is never part of the working tree
        builder.add_line(None, ".git").context("failed to add .git ignore rule")?;
        let rules = builder
            .build()
            .with_context(|| format!("failed to compile ignore rules for {}", root.display()))?;

        let mut matcher =
            Self { root: root.to_path_buf(), layers: vec![IgnoreLayer { dir: Vec::new(), rules }] };
        matcher.load_nested_layers();
        Ok(matcher)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check a path relative to the repository root.
    ///
    /// Every ancestor directory is tested first: once a directory is ignored,
    /// nothing beneath it can be re-included.
    pub fn is_ignored(&self, relative: &Path, is_dir: bool) -> bool {
        let components = split_components(relative);
        if components.is_empty() {
            return false;
        }

        for depth in 1..components.len() {
            if self.matches(&components[..depth], true) {
                return true;
            }
        }
        self.matches(&components, is_dir)
    }

    /// Evaluate the deepest applicable ignore file first; the first file with
    /// an opinion on the path decides.
    fn matches(&self, components: &[String], is_dir: bool) -> bool {
        for layer in self.layers.iter().rev() {
            if layer.dir.len() >= components.len() || !components.starts_with(&layer.dir) {
                continue;
            }
            let local = components[layer.dir.len()..].join("/");
            match layer.rules.matched(Path::new(&local), is_dir) {
                Match::Ignore(_) => return true,
                Match::Whitelist(_) => return false,
                Match::None => {}
            }
        }
        false
    }

    fn load_nested_layers(&mut self) {
        let mut walker = WalkDir::new(&self.root).min_depth(1).sort_by_file_name().into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!("skipping unreadable entry while loading ignore files: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            let dir = entry.path();
            let components = match dir.strip_prefix(&self.root) {
                Ok(rel) => split_components(rel),
                Err(_) => continue,
            };

            // Ignored directories are never descended into, and nested
            // repositories carry their own rules.
            if self.matches(&components, true) || dir.join(".git").exists() {
                walker.skip_current_dir();
                continue;
            }

            let ignore_file = dir.join(GITIGNORE);
            if !ignore_file.is_file() {
                continue;
            }

            let mut builder = GitignoreBuilder::new(dir);
            add_rule_file(&mut builder, &ignore_file);
            match builder.build() {
                Ok(rules) => self.layers.push(IgnoreLayer { dir: components, rules }),
                Err(e) => tracing::warn!("ignoring rules in {}: {}", ignore_file.display(), e),
            }
        }
    }
}

/// Add one rule file; a bad line is reported and the remaining lines are kept.
fn add_rule_file(builder: &mut GitignoreBuilder, path: &Path) {
    if !path.is_file() {
        return;
    }
    if let Some(err) = builder.add(path) {
        tracing::warn!("problem reading ignore rules from {}: {}", path.display(), err);
    }
}

fn split_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}
