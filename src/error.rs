//! Error types for foldersort.
//!
//! Two families of errors exist:
//! - [`ConfigError`] is fatal. It is raised before any file is touched and
//!   aborts the whole run.
//! - [`SortError`] concerns a single file. The orchestrator records it as a
//!   failed result and carries on with the next file.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Source folder not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Source is not a directory: {}", path.display())]
    SourceNotDirectory { path: PathBuf },

    #[error("Source and destination are the same folder: {} (use --force to override)", path.display())]
    SameDirectory { path: PathBuf },

    #[error(
        "Destination {} is inside source {} (use --force to override)",
        destination.display(),
        source_root.display()
    )]
    DestinationInsideSource {
        source_root: PathBuf,
        destination: PathBuf,
    },

    #[error("Invalid sort mode '{0}': expected 'date' or 'ext'")]
    InvalidMode(String),

    #[error("Invalid extension mode '{0}': expected 'last' or 'all'")]
    InvalidGranularity(String),

    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Invalid glob pattern '{0}'")]
    InvalidGlobPattern(String),

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },

    #[error("Could not determine a default {what} folder; pass it explicitly")]
    NoDefaultDirectory { what: &'static str },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-file errors. These never abort a run.
#[derive(Error, Debug)]
pub enum SortError {
    #[error("no free name for {} after {attempts} attempts", path.display())]
    CollisionExhausted { path: PathBuf, attempts: u32 },

    #[error("modification time unavailable")]
    MissingTimestamp,

    #[error("file has no name component")]
    NoFileName,

    #[error("source file no longer exists")]
    SourceMissing,

    #[error("destination already exists: {}", path.display())]
    DestinationOccupied { path: PathBuf },

    #[error("failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "copied to {} but the original could not be removed: {source}",
        destination.display()
    )]
    SourceNotRemoved {
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move to {}: {source}", destination.display())]
    MoveFailed {
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
pub type SortResult<T> = std::result::Result<T, SortError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_not_removed_names_the_copy() {
        let error = SortError::SourceNotRemoved {
            destination: PathBuf::from("/dst/TXT/a.txt"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        let message = error.to_string();

        assert!(message.starts_with("copied to /dst/TXT/a.txt"));
        assert!(message.contains("original could not be removed"));
    }

    #[test]
    fn test_config_errors_mention_force() {
        let error = ConfigError::SameDirectory {
            path: PathBuf::from("/a"),
        };
        assert!(error.to_string().contains("--force"));
    }
}
