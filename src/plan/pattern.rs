//! Target patterns: normalization and expansion into candidate files.

use crate::domain::{Candidate, PatternClass};
use crate::error::PackError;
use crate::filter::segments::has_glob_meta;
use crate::filter::{FilterManager, SegmentPattern};
use crate::utils::{absolutize, clean_display, expand_tilde, normalize_path};
use anyhow::Result;
use globset::{GlobBuilder, GlobMatcher};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Turn a user target into a glob pattern.
///
/// `~` is expanded, and a target naming a directory (an existing one, or
/// anything written with a trailing `/`) becomes a recursive glob below it.
pub fn prepare_pattern(target: &str, working_dir: &Path) -> Result<String> {
    let expanded = expand_tilde(target.trim())?;
    let expanded = if cfg!(windows) { normalize_path(&expanded) } else { expanded };

    let names_directory =
        expanded.ends_with('/') || (!expanded.is_empty() && working_dir.join(&expanded).is_dir());
    if !names_directory {
        return Ok(expanded);
    }

    let dir = expanded.trim_end_matches('/');
    if dir.is_empty() && expanded.starts_with('/') {
        return Ok("/**".to_string());
    }
    Ok(format!("{}/**", dir))
}

/// A prepared target pattern split into its literal base directory and the
/// glob that has to be evaluated below it.
#[derive(Debug)]
pub struct TargetPattern {
    pattern: String,
    /// Leading segments without glob syntax (`""` for the working directory)
    base: String,
    /// `None` when the pattern is a plain path
    matcher: Option<GlobMatcher>,
    /// Walk depth below `base`; `None` when `**` makes it unbounded
    max_depth: Option<usize>,
    segments: SegmentPattern,
}

impl TargetPattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |source: globset::Error| PackError::InvalidPattern {
            kind: "target",
            pattern: pattern.to_string(),
            source,
        };

        let parts = pattern.split('/').collect::<Vec<_>>();
        let literal = parts.iter().take_while(|part| !has_glob_meta(part)).count();
        let rest = &parts[literal..];

        let mut base = parts[..literal].join("/");
        if base.is_empty() && pattern.starts_with('/') {
            base = "/".to_string();
        }

        let matcher = if rest.is_empty() {
            None
        } else {
            let glob = GlobBuilder::new(pattern).literal_separator(true).build().map_err(invalid)?;
            Some(glob.compile_matcher())
        };
        let max_depth = if rest.contains(&"**") { None } else { Some(rest.len()) };
        let segments = SegmentPattern::parse(pattern).map_err(invalid)?;

        Ok(Self { pattern: pattern.to_string(), base, matcher, max_depth, segments })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn segments(&self) -> &SegmentPattern {
        &self.segments
    }

    pub fn is_literal(&self) -> bool {
        self.matcher.is_none()
    }

    /// Files matched by this pattern, in walk order.
    ///
    /// Directories that cannot lead to an admitted file are pruned during
    /// the walk; the returned candidates still have to pass
    /// [`FilterManager::evaluate`].
    pub fn candidates(&self, filter: &FilterManager, class: PatternClass) -> Vec<Candidate> {
        match &self.matcher {
            None => self.literal_candidate(filter.working_dir(), class).into_iter().collect(),
            Some(matcher) => self.walk_candidates(matcher, filter, class),
        }
    }

    fn literal_candidate(&self, working_dir: &Path, class: PatternClass) -> Option<Candidate> {
        let absolute = absolutize(working_dir, Path::new(&self.pattern));
        match fs::metadata(&absolute) {
            Ok(meta) if meta.is_dir() => None,
            Ok(_) => Some(Candidate { absolute, display: clean_display(&self.pattern), class }),
            Err(e) => {
                tracing::warn!("skipping target {:?}: {}", self.pattern, e);
                None
            }
        }
    }

    fn walk_candidates(
        &self,
        matcher: &GlobMatcher,
        filter: &FilterManager,
        class: PatternClass,
    ) -> Vec<Candidate> {
        let root = absolutize(filter.working_dir(), Path::new(&self.base));
        let allow_hidden = filter.allow_dotfiles() || class == PatternClass::Include;

        let mut walker = WalkDir::new(&root).min_depth(1).follow_links(false).sort_by_file_name();
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let keep_dir = |entry: &walkdir::DirEntry| -> bool {
            if !entry.file_type().is_dir() {
                return true;
            }
            let dir_display = self.display_for(&root, entry.path());
            if !self.segments.could_match_below(&dir_display, allow_hidden) {
                return false;
            }
            if filter.is_globally_excluded(entry.path()) {
                tracing::debug!("pruning excluded directory {}", dir_display);
                return false;
            }
            if class == PatternClass::Ordinary
                && !filter.is_force_included(entry.path())
                && filter.is_git_ignored(entry.path(), true)
            {
                tracing::debug!("pruning ignored directory {}", dir_display);
                return false;
            }
            true
        };

        let mut found = Vec::new();
        for entry in walker.into_iter().filter_entry(keep_dir) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    tracing::warn!("skipping target {:?}: {}", self.pattern, e);
                    break;
                }
                Err(e) => {
                    tracing::debug!("skipping unreadable entry under {:?}: {}", self.pattern, e);
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }

            let raw = self.raw_display(&root, entry.path());
            if !matcher.is_match(&raw) {
                continue;
            }
            // Symlinks are followed here so links to files still count
            match fs::metadata(entry.path()) {
                Ok(meta) if meta.is_dir() => continue,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("cannot stat {}: {}", raw, e);
                    continue;
                }
            }

            let display = clean_display(&raw);
            found.push(Candidate { absolute: entry.path().to_path_buf(), display, class });
        }

        if found.is_empty() {
            tracing::debug!("no files matched {:?}", self.pattern);
        }
        found
    }

    /// Entry path in the form the user typed: base plus the walked suffix.
    fn raw_display(&self, root: &Path, path: &Path) -> String {
        let rel = path.strip_prefix(root).map(PathBuf::from).unwrap_or_else(|_| path.to_path_buf());
        let rel = normalize_path(&rel.to_string_lossy());
        if self.base.is_empty() {
            rel
        } else if self.base.ends_with('/') {
            format!("{}{}", self.base, rel)
        } else {
            format!("{}/{}", self.base, rel)
        }
    }

    fn display_for(&self, root: &Path, path: &Path) -> String {
        clean_display(&self.raw_display(root, path))
    }
}
