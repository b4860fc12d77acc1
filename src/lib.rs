//! foldersort - sort a folder's files into date or extension subfolders
//!
//! This library holds the classification and safe-move engine: eligibility
//! filtering, destination key derivation, collision-free renaming, and the
//! batch run that moves files (or only plans the moves during a dry run)
//! and reports a per-file outcome plus a summary.

pub mod candidate;
pub mod cli;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod file_organizer;
pub mod output;
pub mod sort_key;
pub mod sorter;

pub use candidate::{FileCandidate, HiddenAttribute, PlatformHidden, list_candidates};
pub use config::SortConfig;
pub use error::{ConfigError, SortError};
pub use exclusion::ExclusionFilter;
pub use file_organizer::{FileOrganizer, MoveOutcome, MovePlan, MoveResult, PlanAction};
pub use sort_key::{DestinationKey, ExtensionGranularity, SortMode, derive_key};
pub use sorter::{RunSummary, SortOptions, run_sort};

pub use cli::{SortArgs, run_cli};

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set. Otherwise only errors are logged, or everything
/// from this crate down to debug when `verbose` is set. Calling this twice is
/// harmless.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "foldersort=debug" } else { "error" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
