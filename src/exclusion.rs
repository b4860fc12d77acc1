//! Eligibility filtering.
//!
//! Built-in rules, applied in order (any match excludes):
//! 1. Base name starts with `.` (dotfiles)
//! 2. Base name starts with `~$` (office lock and temp files)
//! 3. The platform hidden attribute is set
//!
//! Extra rules from the configuration file run after the built-ins and can
//! only exclude more files.

use crate::candidate::FileCandidate;
use crate::config::ExcludeRules;
use crate::error::{ConfigError, ConfigResult};
use glob::Pattern;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

/// Compiled exclusion rules.
#[derive(Debug, Default)]
pub struct ExclusionFilter {
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
}

impl ExclusionFilter {
    /// A filter with only the built-in rules.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Compiles the extra exclusion rules from a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex pattern is invalid.
    pub fn with_rules(rules: &ExcludeRules) -> ConfigResult<Self> {
        let exclude_patterns = rules
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = rules
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            exclude_filenames: rules.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
        })
    }

    /// Whether a candidate may be sorted at all.
    pub fn is_eligible(&self, candidate: &FileCandidate) -> bool {
        let name = candidate.name.as_str();

        if is_dotfile(name) || is_lock_file(name) || candidate.hidden {
            return false;
        }

        !self.matches_extra_rules(name)
    }

    fn matches_extra_rules(&self, name: &str) -> bool {
        if self.exclude_filenames.contains(name) {
            return true;
        }

        if let Some(ext) = Path::new(name).extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return true;
            }
        }

        self.exclude_patterns.iter().any(|p| p.matches(name))
            || self.exclude_regexes.iter().any(|r| r.is_match(name))
    }
}

fn is_dotfile(name: &str) -> bool {
    name.starts_with('.')
}

fn is_lock_file(name: &str) -> bool {
    name.starts_with("~$")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn candidate(name: &str, hidden: bool) -> FileCandidate {
        FileCandidate {
            path: PathBuf::from("/src").join(name),
            file_name: name.into(),
            name: name.to_string(),
            modified: None,
            hidden,
            exists: true,
        }
    }

    #[test]
    fn test_regular_file_is_eligible() {
        let filter = ExclusionFilter::builtin();
        assert!(filter.is_eligible(&candidate("report.pdf", false)));
        assert!(filter.is_eligible(&candidate("README", false)));
    }

    #[test]
    fn test_dotfiles_excluded() {
        let filter = ExclusionFilter::builtin();
        assert!(!filter.is_eligible(&candidate(".env", false)));
        assert!(!filter.is_eligible(&candidate(".DS_Store", false)));
    }

    #[test]
    fn test_lock_files_excluded() {
        let filter = ExclusionFilter::builtin();
        assert!(!filter.is_eligible(&candidate("~$draft.docx", false)));
        // A plain tilde is not a lock-file prefix
        assert!(filter.is_eligible(&candidate("~notes.txt", false)));
    }

    #[test]
    fn test_hidden_attribute_excluded() {
        let filter = ExclusionFilter::builtin();
        assert!(!filter.is_eligible(&candidate("visible-name.txt", true)));
    }

    #[test]
    fn test_extra_rules_exclude_more() {
        let rules = ExcludeRules {
            filenames: vec!["Thumbs.db".to_string()],
            extensions: vec![".PART".to_string()],
            patterns: vec!["*.crdownload".to_string()],
            regex: vec![r"^tmp_".to_string()],
        };
        let filter = ExclusionFilter::with_rules(&rules).unwrap();

        assert!(!filter.is_eligible(&candidate("Thumbs.db", false)));
        assert!(!filter.is_eligible(&candidate("movie.mkv.part", false)));
        assert!(!filter.is_eligible(&candidate("setup.exe.crdownload", false)));
        assert!(!filter.is_eligible(&candidate("tmp_upload.bin", false)));
        assert!(filter.is_eligible(&candidate("movie.mkv", false)));
    }

    #[test]
    fn test_extra_rules_cannot_reinclude_builtins() {
        let filter = ExclusionFilter::with_rules(&ExcludeRules::default()).unwrap();
        assert!(!filter.is_eligible(&candidate(".env", false)));
        assert!(!filter.is_eligible(&candidate("~$draft.docx", false)));
    }

    #[test]
    fn test_invalid_glob_returns_error() {
        let rules = ExcludeRules {
            patterns: vec!["[invalid".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            ExclusionFilter::with_rules(&rules),
            Err(ConfigError::InvalidGlobPattern(_))
        ));
    }

    #[test]
    fn test_invalid_regex_returns_error() {
        let rules = ExcludeRules {
            regex: vec!["[invalid(".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            ExclusionFilter::with_rules(&rules),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));
    }
}
