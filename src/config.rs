//! Configuration file support.
//!
//! A TOML file can supply defaults for the sort options and extra exclusion
//! rules. Values given on the command line always win over the file.
//!
//! # Configuration File Format
//!
//! ```toml
//! [sort]
//! mode = "ext"          # "date" or "ext"
//! ext_mode = "all"      # "last" or "all"
//! source = "/home/me/Desktop"
//! destination = "/home/me/Documents/Sorted"
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db"]
//! extensions = ["part"]
//! patterns = ["*.crdownload"]
//! regex = ["^tmp_"]
//! ```
//!
//! Exclusions only ever add to the built-in rules. Dotfiles, `~$` lock files
//! and hidden files stay excluded whatever the file says.

use crate::error::{ConfigError, ConfigResult};
use crate::sort_key::{ExtensionGranularity, SortMode};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_NAME: &str = ".foldersortrc.toml";

/// Root of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SortConfig {
    #[serde(default)]
    pub sort: SortDefaults,
    #[serde(default)]
    pub filters: FilterRules,
}

/// Defaults for the sort options. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SortDefaults {
    pub mode: Option<String>,
    pub ext_mode: Option<String>,
    pub source: Option<PathBuf>,
    pub destination: Option<PathBuf>,
}

/// Filter section of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterRules {
    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Extra rules for excluding files from sorting.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name (e.g., "*.crdownload").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Last extensions to exclude, case-insensitive (e.g., "part").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl SortConfig {
    /// Load configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if given (must exist)
    /// 2. `.foldersortrc.toml` in the current directory
    /// 3. `foldersort/config.toml` under the platform config directory
    /// 4. Built-in defaults
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_NAME);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("foldersort").join("config.toml");
            if user_config.exists() {
                return Self::load_from_file(&user_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text, validating the mode strings.
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        config.mode()?;
        config.granularity()?;
        Ok(config)
    }

    /// Sort mode named in the file, if any.
    pub fn mode(&self) -> ConfigResult<Option<SortMode>> {
        self.sort.mode.as_deref().map(str::parse).transpose()
    }

    /// Extension granularity named in the file, if any.
    pub fn granularity(&self) -> ConfigResult<Option<ExtensionGranularity>> {
        self.sort.ext_mode.as_deref().map(str::parse).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_empty() {
        let config = SortConfig::default();
        assert!(config.sort.mode.is_none());
        assert!(config.filters.exclude.filenames.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config = SortConfig::parse(
            r#"
            [sort]
            mode = "ext"
            ext_mode = "last"
            destination = "/tmp/sorted"

            [filters.exclude]
            filenames = ["Thumbs.db"]
            extensions = ["part"]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.mode().unwrap(),
            Some(SortMode::Extension(ExtensionGranularity::All))
        );
        assert_eq!(
            config.granularity().unwrap(),
            Some(ExtensionGranularity::Last)
        );
        assert_eq!(config.sort.destination, Some(PathBuf::from("/tmp/sorted")));
        assert_eq!(config.filters.exclude.filenames, vec!["Thumbs.db"]);
    }

    #[test]
    fn test_parse_partial_config() {
        let config = SortConfig::parse("[filters.exclude]\nregex = [\"^tmp_\"]\n").unwrap();
        assert_eq!(config.mode().unwrap(), None);
        assert_eq!(config.filters.exclude.regex, vec!["^tmp_"]);
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        let result = SortConfig::parse("[sort]\nmode = \"size\"\n");
        assert!(matches!(result, Err(ConfigError::InvalidMode(m)) if m == "size"));
    }

    #[test]
    fn test_parse_rejects_unknown_granularity() {
        let result = SortConfig::parse("[sort]\next_mode = \"first\"\n");
        assert!(matches!(result, Err(ConfigError::InvalidGranularity(_))));
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        let result = SortConfig::parse("[sort\nmode = ");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = SortConfig::load(Some(Path::new("/non/existent/foldersort.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[sort]\nmode = \"date\"\n").expect("Failed to write config");

        let config = SortConfig::load(Some(&path)).unwrap();
        assert_eq!(config.mode().unwrap(), Some(SortMode::Date));
    }
}
