//! Collision-safe file moves.
//!
//! This module resolves a free destination name for a file and then moves it
//! there (or only reports the plan during a dry run). A failed move is
//! returned as a [`MoveOutcome::Failed`] result and never aborts the caller.
use crate::candidate::FileCandidate;
use crate::error::{SortError, SortResult};
use crate::sort_key::DestinationKey;
use std::ffi::OsStr;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Highest numeric suffix tried before giving up on a name.
pub const MAX_COLLISION_ATTEMPTS: u32 = 10_000;

/// What to do with one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    /// Move into `destination`, which was free when it was resolved.
    Move {
        key: DestinationKey,
        destination: PathBuf,
    },
    /// Leave the file where it is (ineligible).
    Skip,
}

/// A candidate paired with its resolved action.
#[derive(Debug, Clone)]
pub struct MovePlan<'a> {
    pub candidate: &'a FileCandidate,
    pub action: PlanAction,
}

/// Outcome of executing or simulating one plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Dry run: the move would happen.
    Planned,
    /// The file was moved.
    Moved,
    /// The file was ineligible and left alone.
    Skipped,
    /// The move could not be done; carries the reason.
    Failed(String),
}

/// Per-file record of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
    pub key: Option<DestinationKey>,
    pub outcome: MoveOutcome,
}

impl MoveResult {
    /// A failed result for a file that never got as far as a plan.
    pub fn failed(source: &Path, error: &SortError) -> Self {
        Self {
            source: source.to_path_buf(),
            destination: None,
            key: None,
            outcome: MoveOutcome::Failed(error.to_string()),
        }
    }

    /// Whether the file was moved or would be moved.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, MoveOutcome::Planned | MoveOutcome::Moved)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, MoveOutcome::Failed(_))
    }
}

/// Resolves destinations and moves files.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Returns a path inside `dir` named `name` that does not exist yet.
    ///
    /// When `dir/name` is taken, `stem (1).ext`, `stem (2).ext`, ... are tried
    /// in order. The suffix goes before the last extension only, so
    /// `archive.tar.gz` becomes `archive.tar (1).gz`. The name is handled as
    /// raw `OsStr` pieces, so names that are not valid UTF-8 keep their bytes.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use foldersort::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let path = FileOrganizer::resolve_destination(Path::new("/sorted/TXT"), "notes.txt")?;
    /// println!("{}", path.display());
    /// # Ok::<(), foldersort::SortError>(())
    /// ```
    pub fn resolve_destination(dir: &Path, name: impl AsRef<OsStr>) -> SortResult<PathBuf> {
        Self::resolve_destination_with(dir, name, path_occupied)
    }

    /// Like [`resolve_destination`](Self::resolve_destination), with a custom
    /// occupancy check. The orchestrator uses this to also treat paths already
    /// planned earlier in the same run as taken.
    pub fn resolve_destination_with<F>(
        dir: &Path,
        name: impl AsRef<OsStr>,
        is_taken: F,
    ) -> SortResult<PathBuf>
    where
        F: Fn(&Path) -> bool,
    {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(SortError::NoFileName);
        }

        let wanted = dir.join(name);
        if !is_taken(&wanted) {
            return Ok(wanted);
        }

        let as_path = Path::new(name);
        let stem = as_path.file_stem().unwrap_or(name);
        let extension = as_path.extension();

        for counter in 1..=MAX_COLLISION_ATTEMPTS {
            let mut renamed = stem.to_os_string();
            renamed.push(format!(" ({})", counter));
            if let Some(ext) = extension {
                renamed.push(".");
                renamed.push(ext);
            }
            let candidate = dir.join(renamed);
            if !is_taken(&candidate) {
                tracing::debug!(from = %wanted.display(), to = %candidate.display(), "renamed to avoid collision");
                return Ok(candidate);
            }
        }

        Err(SortError::CollisionExhausted {
            path: wanted,
            attempts: MAX_COLLISION_ATTEMPTS,
        })
    }

    /// Executes a plan, or only reports it when `dry_run` is set.
    ///
    /// A real run creates the destination directory if needed and then moves
    /// the single named file. Nothing else is touched. Every failure is
    /// captured in the returned result.
    pub fn execute(plan: &MovePlan<'_>, dry_run: bool) -> MoveResult {
        let source = plan.candidate.path.clone();

        let (key, destination) = match &plan.action {
            PlanAction::Skip => {
                return MoveResult {
                    source,
                    destination: None,
                    key: None,
                    outcome: MoveOutcome::Skipped,
                };
            }
            PlanAction::Move { key, destination } => (key.clone(), destination.clone()),
        };

        let outcome = if !plan.candidate.exists {
            MoveOutcome::Failed(SortError::SourceMissing.to_string())
        } else if dry_run {
            MoveOutcome::Planned
        } else {
            match Self::move_file(&source, &destination) {
                Ok(()) => MoveOutcome::Moved,
                Err(e) => {
                    tracing::warn!(source = %source.display(), error = %e, "move failed");
                    MoveOutcome::Failed(e.to_string())
                }
            }
        };

        MoveResult {
            source,
            destination: Some(destination),
            key: Some(key),
            outcome,
        }
    }

    /// Moves `source` to `destination`, refusing to replace an existing file.
    fn move_file(source: &Path, destination: &Path) -> SortResult<()> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| SortError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        if !path_occupied(source) {
            return Err(SortError::SourceMissing);
        }

        // Re-checked right before the rename; rename would silently replace it.
        if path_occupied(destination) {
            return Err(SortError::DestinationOccupied {
                path: destination.to_path_buf(),
            });
        }

        match fs::rename(source, destination) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                tracing::debug!(source = %source.display(), "rename crosses devices, copying");
                copy_then_remove(source, destination)
            }
            Err(e) => Err(SortError::MoveFailed {
                destination: destination.to_path_buf(),
                source: e,
            }),
        }
    }
}

/// Whether anything (file, directory, or dangling symlink) sits at `path`.
fn path_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Cross-device move: copy into a newly created file, verify the size, then
/// delete the source. The partial copy is removed on any failure.
fn copy_then_remove(source: &Path, destination: &Path) -> SortResult<()> {
    let move_failed = |e: io::Error| SortError::MoveFailed {
        destination: destination.to_path_buf(),
        source: e,
    };

    let metadata = fs::metadata(source).map_err(move_failed)?;
    let mut reader = File::open(source).map_err(move_failed)?;
    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
        .map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                SortError::DestinationOccupied {
                    path: destination.to_path_buf(),
                }
            } else {
                move_failed(e)
            }
        })?;

    let written = io::copy(&mut reader, &mut writer)
        .and_then(|copied| {
            if copied != metadata.len() {
                return Err(io::Error::other(format!(
                    "copy verification failed: source {} bytes, destination {} bytes",
                    metadata.len(),
                    copied
                )));
            }
            if let Ok(modified) = metadata.modified() {
                writer.set_modified(modified)?;
            }
            writer.set_permissions(metadata.permissions())
        })
        .map_err(move_failed);

    drop(writer);
    if let Err(e) = written {
        let _ = fs::remove_file(destination);
        return Err(e);
    }

    fs::remove_file(source).map_err(|e| {
        tracing::warn!(
            source = %source.display(),
            destination = %destination.display(),
            error = %e,
            "copy kept but original could not be removed"
        );
        SortError::SourceNotRemoved {
            destination: destination.to_path_buf(),
            source: e,
        }
    })
}
