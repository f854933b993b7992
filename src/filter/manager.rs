//! Filter policy: exclude and force-include patterns, dotfile visibility and
//! per-repository ignore rules.

use super::gitignore::IgnoreMatcher;
use super::segments::{has_hidden_component, SegmentPattern};
use crate::domain::PatternClass;
use crate::error::PackError;
use crate::project::find_root;
use crate::utils::{expand_tilde, normalize_path};
use anyhow::Result;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Options for [`FilterManager::new`].
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub exclude_patterns: Vec<String>,
    pub include_patterns: Vec<String>,
    pub disable_gitignore: bool,
    pub allow_dotfiles: bool,
    /// Relative exclude/include patterns are matched against paths relative to this
    pub working_dir: PathBuf,
}

/// Outcome of applying the precedence rules to one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Admitted,
    Excluded,
    Hidden,
    Ignored,
}

impl Verdict {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Verdict::Admitted)
    }
}

/// Glob patterns matched against both the absolute and the working-dir
/// relative form of a path.
struct PatternSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl PatternSet {
    fn new(kind: &'static str, patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let mut prepared = Vec::with_capacity(patterns.len());
        for raw in patterns {
            let pattern = prepare_filter_pattern(raw)?;
            let glob = GlobBuilder::new(&pattern).literal_separator(true).build().map_err(|source| {
                PackError::InvalidPattern { kind, pattern: raw.clone(), source }
            })?;
            builder.add(glob);
            prepared.push(pattern);
        }
        let set = builder.build().map_err(|source| PackError::InvalidPattern {
            kind,
            pattern: patterns.join(","),
            source,
        })?;
        Ok(Self { patterns: prepared, set })
    }

    /// True if the path or any of its ancestors matches.
    ///
    /// Ancestors are checked up to (not including) the working directory for
    /// paths inside it, and up to the filesystem root otherwise.
    fn matches(&self, abs_path: &Path, working_dir: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let inside = abs_path.starts_with(working_dir);
        abs_path
            .ancestors()
            .take_while(|dir| dir.parent().is_some() && !(inside && *dir == working_dir))
            .any(|dir| self.matches_exactly(dir, working_dir))
    }

    fn matches_exactly(&self, abs_path: &Path, working_dir: &Path) -> bool {
        if self.set.is_match(normalize_path(&abs_path.to_string_lossy())) {
            return true;
        }
        match abs_path.strip_prefix(working_dir) {
            Ok(rel) if !rel.as_os_str().is_empty() => {
                self.set.is_match(normalize_path(&rel.to_string_lossy()))
            }
            _ => false,
        }
    }
}

/// Matcher of one repository root, built at most once.
type MatcherSlot = Arc<OnceCell<Option<Arc<IgnoreMatcher>>>>;

/// Repository lookups shared by every planner worker.
#[derive(Default)]
struct RepoCache {
    /// Directory -> owning repository root (`None` when not in a repository)
    roots: HashMap<PathBuf, Option<PathBuf>>,
    matchers: HashMap<PathBuf, MatcherSlot>,
}

/// Decides which candidate paths make it into the plan.
///
/// Ignore rules are compiled once per repository root and cached for the
/// lifetime of the manager.
pub struct FilterManager {
    exclude: PatternSet,
    include: PatternSet,
    disable_gitignore: bool,
    allow_dotfiles: bool,
    working_dir: PathBuf,
    repos: Mutex<RepoCache>,
}

impl FilterManager {
    pub fn new(opts: FilterOptions) -> Result<Self> {
        Ok(Self {
            exclude: PatternSet::new("exclude", &opts.exclude_patterns)?,
            include: PatternSet::new("include", &opts.include_patterns)?,
            disable_gitignore: opts.disable_gitignore,
            allow_dotfiles: opts.allow_dotfiles,
            working_dir: opts.working_dir,
            repos: Mutex::new(RepoCache::default()),
        })
    }

    /// Include patterns after `~` expansion and trailing-slash trimming.
    pub fn include_patterns(&self) -> &[String] {
        &self.include.patterns
    }

    pub fn allow_dotfiles(&self) -> bool {
        self.allow_dotfiles
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// True if any exclude pattern matches the path or one of its parent
    /// directories.
    pub fn is_globally_excluded(&self, abs_path: &Path) -> bool {
        self.exclude.matches(abs_path, &self.working_dir)
    }

    /// True if any force-include pattern matches the path or one of its
    /// parent directories.
    pub fn is_force_included(&self, abs_path: &Path) -> bool {
        self.include.matches(abs_path, &self.working_dir)
    }

    /// True if a dot-prefixed segment of `display_path` is not spelled out by
    /// the corresponding segment of the pattern that produced it.
    pub fn is_dotfile_hidden(&self, display_path: &str, pattern: &SegmentPattern) -> bool {
        if self.allow_dotfiles || !has_hidden_component(display_path) {
            return false;
        }
        !pattern.matches(display_path, false)
    }

    /// Check the path against the ignore rules of the repository that owns it.
    ///
    /// Fails open: a path whose repository cannot be resolved is not ignored.
    pub fn is_git_ignored(&self, abs_path: &Path, is_dir: bool) -> bool {
        if self.disable_gitignore {
            return false;
        }
        let Some(parent) = abs_path.parent() else {
            return false;
        };
        let Some(matcher) = self.matcher_for(parent) else {
            return false;
        };
        match relative_to_root(abs_path, matcher.root()) {
            Some(rel) => matcher.is_ignored(&rel, is_dir),
            None => {
                tracing::debug!(
                    "cannot place {} under repository root {}",
                    abs_path.display(),
                    matcher.root().display()
                );
                false
            }
        }
    }

    /// Apply the precedence rules: exclude beats everything, force-include
    /// beats dotfile hiding and ignore rules, then dotfiles, then ignore rules.
    pub fn evaluate(
        &self,
        abs_path: &Path,
        display_path: &str,
        class: PatternClass,
        pattern: &SegmentPattern,
    ) -> Verdict {
        if self.is_globally_excluded(abs_path) {
            return Verdict::Excluded;
        }
        if class == PatternClass::Include || self.is_force_included(abs_path) {
            return Verdict::Admitted;
        }
        if self.is_dotfile_hidden(display_path, pattern) {
            return Verdict::Hidden;
        }
        if self.is_git_ignored(abs_path, false) {
            return Verdict::Ignored;
        }
        Verdict::Admitted
    }

    /// Get or build the ignore matcher of the repository owning `dir`.
    ///
    /// The cache lock only guards map lookups. Repository discovery and rule
    /// loading run outside it; workers asking for the same root wait on that
    /// root's slot while other roots proceed.
    fn matcher_for(&self, dir: &Path) -> Option<Arc<IgnoreMatcher>> {
        let cached = self.lock_cache().roots.get(dir).cloned();
        let root = match cached {
            Some(root) => root,
            None => {
                let root = resolve_repository(dir);
                self.lock_cache().roots.insert(dir.to_path_buf(), root.clone());
                root
            }
        }?;

        let slot = Arc::clone(self.lock_cache().matchers.entry(root.clone()).or_default());
        slot.get_or_init(|| match IgnoreMatcher::build(&root) {
            Ok(matcher) => {
                tracing::debug!("loaded ignore rules for {}", root.display());
                Some(Arc::new(matcher))
            }
            Err(e) => {
                tracing::warn!("cannot load ignore rules for {}: {:#}", root.display(), e);
                None
            }
        })
        .clone()
    }

    fn lock_cache(&self) -> MutexGuard<'_, RepoCache> {
        self.repos.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn cached_repositories(&self) -> usize {
        let cache = self.lock_cache();
        cache.matchers.values().filter(|slot| matches!(slot.get(), Some(Some(_)))).count()
    }
}

fn resolve_repository(dir: &Path) -> Option<PathBuf> {
    match find_root(dir) {
        Ok(found) if found.is_repository => Some(found.path),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("cannot resolve repository for {}: {:#}", dir.display(), e);
            None
        }
    }
}

fn prepare_filter_pattern(raw: &str) -> Result<String> {
    let expanded = expand_tilde(raw.trim())?;
    let expanded = if cfg!(windows) { normalize_path(&expanded) } else { expanded };
    let trimmed = expanded.trim_end_matches('/');
    Ok(if trimmed.is_empty() { expanded } else { trimmed.to_string() })
}

/// `abs_path` relative to `root`, retrying with symlinks resolved when the
/// lexical forms disagree (e.g. `/var` vs `/private/var`).
fn relative_to_root(abs_path: &Path, root: &Path) -> Option<PathBuf> {
    if let Ok(rel) = abs_path.strip_prefix(root) {
        return Some(rel.to_path_buf());
    }
    let root = root.canonicalize().ok()?;
    let parent = abs_path.parent()?.canonicalize().ok()?;
    let rel = parent.strip_prefix(&root).ok()?;
    Some(match abs_path.file_name() {
        Some(name) => rel.join(name),
        None => rel.to_path_buf(),
    })
}
