//! Destination key derivation.
//!
//! A key names the subfolder of the destination root that a file is sorted
//! into. Keys are pure functions of a [`FileCandidate`] and a [`SortMode`]:
//! no filesystem access happens here.
//!
//! # Examples
//!
//! ```
//! use foldersort::sort_key::{derive_extension_key, ExtensionGranularity};
//!
//! assert_eq!(derive_extension_key("archive.tar.gz", ExtensionGranularity::All).as_str(), "TAR.GZ");
//! assert_eq!(derive_extension_key("archive.tar.gz", ExtensionGranularity::Last).as_str(), "GZ");
//! assert_eq!(derive_extension_key("README", ExtensionGranularity::All).as_str(), "NO_EXT");
//! ```
use crate::candidate::FileCandidate;
use crate::error::{ConfigError, SortError, SortResult};
use chrono::{DateTime, Local};
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

/// Folder used for files without any extension.
pub const NO_EXTENSION_KEY: &str = "NO_EXT";

/// How much of a compound extension forms the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExtensionGranularity {
    /// Final suffix only: `archive.tar.gz` goes to `GZ`.
    Last,
    /// Every suffix after the first dot: `archive.tar.gz` goes to `TAR.GZ`.
    #[default]
    All,
}

/// Strategy for choosing destination subfolders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// One folder per modification day, `YYYY-MM-DD`.
    #[default]
    Date,
    /// One folder per upper-cased extension.
    Extension(ExtensionGranularity),
}

impl SortMode {
    /// Short name used on the command line and in config files.
    pub fn name(&self) -> &'static str {
        match self {
            SortMode::Date => "date",
            SortMode::Extension(_) => "ext",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::Date => f.write_str(self.name()),
            SortMode::Extension(granularity) => write!(f, "{} ({})", self.name(), granularity),
        }
    }
}

/// Parses `date` or `ext`. Extension mode starts with the default granularity.
impl FromStr for SortMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortMode::Date),
            "ext" | "extension" => Ok(SortMode::Extension(ExtensionGranularity::default())),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for ExtensionGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionGranularity::Last => write!(f, "last"),
            ExtensionGranularity::All => write!(f, "all"),
        }
    }
}

impl FromStr for ExtensionGranularity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last" => Ok(ExtensionGranularity::Last),
            "all" => Ok(ExtensionGranularity::All),
            _ => Err(ConfigError::InvalidGranularity(s.to_string())),
        }
    }
}

/// Name of a destination subfolder, e.g. `2025-10-14` or `TAR.GZ`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DestinationKey(String);

impl DestinationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DestinationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the destination key for a candidate.
///
/// Date keys come from the file's own modification time, so files of
/// different ages land in different folders within the same run. The only
/// failure is a candidate whose modification time is unknown in date mode.
pub fn derive_key(candidate: &FileCandidate, mode: SortMode) -> SortResult<DestinationKey> {
    match mode {
        SortMode::Date => candidate
            .modified
            .map(derive_date_key)
            .ok_or(SortError::MissingTimestamp),
        SortMode::Extension(granularity) => {
            Ok(derive_extension_key(&candidate.name, granularity))
        }
    }
}

/// Formats a timestamp as a local calendar day.
pub fn derive_date_key(modified: SystemTime) -> DestinationKey {
    let local: DateTime<Local> = modified.into();
    DestinationKey(local.format("%Y-%m-%d").to_string())
}

/// Computes the extension key of a base name.
///
/// Empty segments are ignored, so `file.` has no extension and `a..gz` maps
/// to `GZ`.
pub fn derive_extension_key(name: &str, granularity: ExtensionGranularity) -> DestinationKey {
    let Some((_, suffixes)) = name.split_once('.') else {
        return DestinationKey(NO_EXTENSION_KEY.to_string());
    };

    let mut segments = suffixes.split('.').filter(|s| !s.is_empty());
    let key = match granularity {
        ExtensionGranularity::Last => segments.next_back().map(str::to_string),
        ExtensionGranularity::All => {
            let joined = segments.collect::<Vec<_>>().join(".");
            (!joined.is_empty()).then_some(joined)
        }
    };

    match key {
        Some(key) => DestinationKey(key.to_uppercase()),
        None => DestinationKey(NO_EXTENSION_KEY.to_string()),
    }
}
