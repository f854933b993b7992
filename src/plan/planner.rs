//! Plan construction: expand every target, filter, classify, dedup and sort.

use super::pattern::{prepare_pattern, TargetPattern};
use crate::detect::{read_sample, Classifier, SAMPLE_SIZE};
use crate::domain::{Candidate, PatternClass, PlannedFile};
use crate::filter::FilterManager;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

/// Builds the ordered, deduplicated list of files to pack.
pub struct Planner<'a> {
    filter: &'a FilterManager,
    classifier: &'a dyn Classifier,
}

impl<'a> Planner<'a> {
    pub fn new(filter: &'a FilterManager, classifier: &'a dyn Classifier) -> Self {
        Self { filter, classifier }
    }

    /// Expand force-include patterns and then `targets` into a plan sorted by
    /// display path.
    ///
    /// A target that cannot be expanded is reported and skipped; planning
    /// itself never fails.
    pub fn plan(&self, targets: &[String]) -> Vec<PlannedFile> {
        let jobs = self
            .filter
            .include_patterns()
            .iter()
            .map(|pattern| (pattern.as_str(), PatternClass::Include))
            .chain(targets.iter().map(|target| (target.as_str(), PatternClass::Ordinary)))
            .collect::<Vec<_>>();

        // One task per target; collect() keeps job order so the first
        // admission of a file is deterministic.
        let batches = jobs
            .par_iter()
            .map(|(target, class)| self.plan_target(target, *class))
            .collect::<Vec<_>>();

        let mut seen = HashSet::new();
        let mut plan = Vec::new();
        for file in batches.into_iter().flatten() {
            if seen.insert(identity(&file)) {
                plan.push(file);
            } else {
                tracing::debug!("dropping duplicate {}", file.path);
            }
        }

        plan.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!("planned {} files from {} patterns", plan.len(), jobs.len());
        plan
    }

    fn plan_target(&self, target: &str, class: PatternClass) -> Vec<PlannedFile> {
        let pattern = match prepare_pattern(target, self.filter.working_dir())
            .and_then(|prepared| TargetPattern::parse(&prepared))
        {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::warn!("skipping target {:?}: {:#}", target, e);
                return Vec::new();
            }
        };

        pattern
            .candidates(self.filter, class)
            .into_iter()
            .filter(|candidate| self.admit(candidate, &pattern))
            .filter_map(|candidate| self.classify(candidate))
            .collect()
    }

    fn admit(&self, candidate: &Candidate, pattern: &TargetPattern) -> bool {
        let verdict = self.filter.evaluate(
            &candidate.absolute,
            &candidate.display,
            candidate.class,
            pattern.segments(),
        );
        if !verdict.is_admitted() {
            tracing::debug!(
                "rejected {} ({:?}, {} pattern {:?})",
                candidate.display,
                verdict,
                candidate.class.as_str(),
                pattern.as_str()
            );
        }
        verdict.is_admitted()
    }

    fn classify(&self, candidate: Candidate) -> Option<PlannedFile> {
        let sample = match read_sample(&candidate.absolute, SAMPLE_SIZE) {
            Ok(sample) => Some(sample),
            Err(e) => {
                tracing::debug!("cannot sample {}: {}", candidate.display, e);
                None
            }
        };

        let classification = self.classifier.classify(&candidate.absolute, sample.as_deref());
        if classification.is_binary {
            tracing::debug!("skipping binary file {}", candidate.display);
            return None;
        }

        Some(PlannedFile {
            path: candidate.display,
            absolute: candidate.absolute,
            language: classification.language,
        })
    }
}

/// Dedup key: the canonical path, or the lexical absolute path when the
/// file cannot be canonicalized.
fn identity(file: &PlannedFile) -> PathBuf {
    fs::canonicalize(&file.absolute).unwrap_or_else(|_| file.absolute.clone())
}
