//! Batch orchestration.
//!
//! [`run_sort`] drives every candidate through the pipeline, in the order the
//! candidates were supplied:
//!
//! 1. Eligibility check; ineligible files are recorded as skipped
//! 2. Key derivation; target directory is `destination_root/key`
//! 3. Collision resolution against that directory
//! 4. Execution (or simulation during a dry run)
//!
//! Unless `force` is set, the source and destination roots are validated
//! first. A validation failure aborts the run before any file is touched.
//! Per-file failures are recorded and the loop carries on.

use crate::candidate::FileCandidate;
use crate::error::{ConfigError, ConfigResult, SortError, SortResult};
use crate::exclusion::ExclusionFilter;
use crate::file_organizer::{FileOrganizer, MoveOutcome, MovePlan, MoveResult, PlanAction};
use crate::sort_key::{self, DestinationKey, SortMode};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Options for one run. Read-only once built.
#[derive(Debug, Clone)]
pub struct SortOptions {
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    pub mode: SortMode,
    pub dry_run: bool,
    /// Skip the source/destination relationship checks.
    pub force: bool,
}

/// Aggregate outcome of one run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub source_root: PathBuf,
    pub destination_root: PathBuf,
    pub mode: SortMode,
    pub dry_run: bool,
    /// Moved, or planned during a dry run.
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub results: Vec<MoveResult>,
}

impl RunSummary {
    fn new(options: &SortOptions, results: Vec<MoveResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        let failed = results.iter().filter(|r| r.is_failure()).count();
        let skipped = results
            .iter()
            .filter(|r| r.outcome == MoveOutcome::Skipped)
            .count();

        Self {
            source_root: options.source_root.clone(),
            destination_root: options.destination_root.clone(),
            mode: options.mode,
            dry_run: options.dry_run,
            succeeded,
            failed,
            skipped,
            results,
        }
    }

    /// Distinct keys that received (or would receive) at least one file.
    pub fn keys(&self) -> BTreeSet<&DestinationKey> {
        self.results
            .iter()
            .filter(|r| r.is_success())
            .filter_map(|r| r.key.as_ref())
            .collect()
    }

    /// Destination shown in the summary.
    ///
    /// In date mode, when every file went into the same day folder, that
    /// folder is shown. Otherwise the destination root is shown.
    pub fn display_destination(&self) -> PathBuf {
        if self.mode == SortMode::Date {
            let keys = self.keys();
            if let (1, Some(key)) = (keys.len(), keys.first()) {
                return self.destination_root.join(key.as_str());
            }
        }
        self.destination_root.clone()
    }
}

/// Checks that the source root exists and is a directory.
pub fn validate_source(source_root: &Path) -> ConfigResult<()> {
    if !source_root.exists() {
        return Err(ConfigError::SourceNotFound {
            path: source_root.to_path_buf(),
        });
    }
    if !source_root.is_dir() {
        return Err(ConfigError::SourceNotDirectory {
            path: source_root.to_path_buf(),
        });
    }
    Ok(())
}

/// Rejects a destination equal to, or nested inside, the source.
///
/// Both paths are resolved first, so `.`/`..` segments and symlinks are
/// compared by what they point at. The destination may not exist yet.
pub fn validate_roots(source_root: &Path, destination_root: &Path) -> ConfigResult<()> {
    let source = normalize(source_root);
    let destination = normalize(destination_root);

    if source == destination {
        return Err(ConfigError::SameDirectory { path: source });
    }
    if destination.starts_with(&source) {
        return Err(ConfigError::DestinationInsideSource {
            source_root: source,
            destination,
        });
    }
    Ok(())
}

/// Canonicalizes the longest existing prefix of `path` and re-appends the
/// rest.
fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut existing = absolute.as_path();
    let mut tail = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return tail
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                existing = parent;
            }
            _ => return absolute,
        }
    }
}

/// Sorts `candidates` into `options.destination_root`.
///
/// # Errors
///
/// Only configuration errors are returned, and only before any file has been
/// touched. Per-file problems end up in the summary.
pub fn run_sort(
    candidates: &[FileCandidate],
    filter: &ExclusionFilter,
    options: &SortOptions,
) -> ConfigResult<RunSummary> {
    if !options.force {
        validate_roots(&options.source_root, &options.destination_root)?;
    }

    tracing::debug!(
        source = %options.source_root.display(),
        destination = %options.destination_root.display(),
        mode = %options.mode,
        dry_run = options.dry_run,
        candidates = candidates.len(),
        "starting sort"
    );

    Ok(sort_candidates(candidates, filter, options, HashSet::new()))
}

/// The per-file loop of [`run_sort`], after validation.
///
/// `reserved` holds destinations handed out earlier in this run. A dry run
/// never creates them, so the filesystem alone cannot tell they are taken.
/// Paths are compared exactly: on a case-insensitive filesystem a dry run of
/// `a.txt` and `A.txt` plans two names where the real run renames the second
/// to `A (1).txt`.
fn sort_candidates(
    candidates: &[FileCandidate],
    filter: &ExclusionFilter,
    options: &SortOptions,
    mut reserved: HashSet<PathBuf>,
) -> RunSummary {
    let mut results = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let result = match plan_candidate(candidate, filter, options, &reserved) {
            Ok(plan) => {
                if let PlanAction::Move { destination, .. } = &plan.action {
                    reserved.insert(destination.clone());
                }
                FileOrganizer::execute(&plan, options.dry_run)
            }
            Err(e) => {
                tracing::warn!(source = %candidate.path.display(), error = %e, "could not plan move");
                MoveResult::failed(&candidate.path, &e)
            }
        };
        results.push(result);
    }

    let summary = RunSummary::new(options, results);
    tracing::debug!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        skipped = summary.skipped,
        "sort finished"
    );
    summary
}

fn plan_candidate<'a>(
    candidate: &'a FileCandidate,
    filter: &ExclusionFilter,
    options: &SortOptions,
    reserved: &HashSet<PathBuf>,
) -> SortResult<MovePlan<'a>> {
    if !filter.is_eligible(candidate) {
        tracing::debug!(source = %candidate.path.display(), "skipping ineligible file");
        return Ok(MovePlan {
            candidate,
            action: PlanAction::Skip,
        });
    }

    if candidate.file_name.is_empty() {
        return Err(SortError::NoFileName);
    }

    let key = sort_key::derive_key(candidate, options.mode)?;
    let target_dir = options.destination_root.join(key.as_str());
    let destination =
        FileOrganizer::resolve_destination_with(&target_dir, &candidate.file_name, |path| {
            reserved.contains(path) || path.symlink_metadata().is_ok()
        })?;

    Ok(MovePlan {
        candidate,
        action: PlanAction::Move { key, destination },
    })
}
