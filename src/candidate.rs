//! File candidates and the platform collaborators that produce them.
//!
//! A [`FileCandidate`] is a snapshot of one directory entry taken when the
//! source folder is listed. The core never stats files on its own to decide
//! eligibility or keys; everything it needs is captured here.

use crate::error::{ConfigError, ConfigResult};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One file under consideration for sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Base name exactly as the filesystem reports it. Destination paths are
    /// built from this, never from `name`.
    pub file_name: OsString,
    /// Lossy UTF-8 form of the base name, for exclusion rules and keys.
    pub name: String,
    /// Modification time, if the platform reports one.
    pub modified: Option<SystemTime>,
    /// Platform hidden attribute, `false` where unsupported.
    pub hidden: bool,
    /// Whether the file existed when the candidate was built.
    pub exists: bool,
}

impl FileCandidate {
    /// Builds a candidate by reading the file's metadata.
    ///
    /// A file that cannot be stat'ed is still returned, marked as not existing,
    /// so it shows up as a failure in the run report instead of vanishing.
    pub fn from_path(path: &Path, probe: &dyn HiddenAttribute) -> Self {
        let file_name = path.file_name().map(OsString::from).unwrap_or_default();
        let name = file_name.to_string_lossy().into_owned();

        match fs::metadata(path) {
            Ok(metadata) => Self {
                path: path.to_path_buf(),
                file_name,
                name,
                modified: metadata.modified().ok(),
                hidden: probe.is_hidden(path),
                exists: true,
            },
            Err(_) => Self {
                path: path.to_path_buf(),
                file_name,
                name,
                modified: None,
                hidden: false,
                exists: false,
            },
        }
    }
}

/// Capability for platform hidden-attribute detection.
///
/// Implementations must never fail: anything that cannot be determined is
/// reported as not hidden.
pub trait HiddenAttribute {
    fn is_hidden(&self, path: &Path) -> bool;
}

/// Hidden-attribute probe for the current platform.
///
/// Windows reads `FILE_ATTRIBUTE_HIDDEN`, macOS reads the `UF_HIDDEN` flag,
/// everything else has no such attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformHidden;

impl HiddenAttribute for PlatformHidden {
    #[cfg(windows)]
    fn is_hidden(&self, path: &Path) -> bool {
        use std::os::windows::fs::MetadataExt;
        const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

        fs::metadata(path)
            .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
            .unwrap_or(false)
    }

    #[cfg(target_os = "macos")]
    fn is_hidden(&self, path: &Path) -> bool {
        use std::os::macos::fs::MetadataExt;
        const UF_HIDDEN: u32 = 0x8000;

        fs::metadata(path)
            .map(|m| m.st_flags() & UF_HIDDEN != 0)
            .unwrap_or(false)
    }

    #[cfg(not(any(windows, target_os = "macos")))]
    fn is_hidden(&self, _path: &Path) -> bool {
        false
    }
}

/// Lists the regular files directly inside `dir`, in directory-listing order.
///
/// Subdirectories and other non-file entries are left out entirely; they are
/// neither candidates nor counted as skipped.
pub fn list_candidates(dir: &Path, probe: &dyn HiddenAttribute) -> ConfigResult<Vec<FileCandidate>> {
    let entries = fs::read_dir(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut candidates = Vec::new();
    for entry in entries.flatten() {
        if let Ok(file_type) = entry.file_type()
            && file_type.is_file()
        {
            candidates.push(FileCandidate::from_path(&entry.path(), probe));
        }
    }

    tracing::debug!(dir = %dir.display(), count = candidates.len(), "listed candidates");
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct AlwaysHidden;

    impl HiddenAttribute for AlwaysHidden {
        fn is_hidden(&self, _path: &Path) -> bool {
            true
        }
    }

    #[test]
    fn test_from_path_reads_metadata() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("notes.txt");
        fs::write(&file_path, "hello").expect("Failed to write file");

        let candidate = FileCandidate::from_path(&file_path, &PlatformHidden);

        assert_eq!(candidate.name, "notes.txt");
        assert!(candidate.exists);
        assert!(candidate.modified.is_some());
        assert!(!candidate.hidden);
    }

    #[test]
    fn test_from_path_uses_probe() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file_path = temp_dir.path().join("secret.txt");
        fs::write(&file_path, "x").expect("Failed to write file");

        let candidate = FileCandidate::from_path(&file_path, &AlwaysHidden);
        assert!(candidate.hidden);
    }

    #[test]
    fn test_from_path_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let candidate = FileCandidate::from_path(&temp_dir.path().join("gone.txt"), &AlwaysHidden);

        assert!(!candidate.exists);
        assert!(!candidate.hidden);
        assert_eq!(candidate.modified, None);
    }

    #[test]
    fn test_list_candidates_skips_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("a.txt"), "a").expect("Failed to write file");
        fs::write(temp_dir.path().join("b.pdf"), "b").expect("Failed to write file");
        fs::create_dir(temp_dir.path().join("nested")).expect("Failed to create dir");
        fs::write(temp_dir.path().join("nested").join("c.txt"), "c")
            .expect("Failed to write file");

        let mut names: Vec<_> = list_candidates(temp_dir.path(), &PlatformHidden)
            .expect("Failed to list")
            .into_iter()
            .map(|c| c.name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["a.txt", "b.pdf"]);
    }

    #[test]
    fn test_from_path_without_file_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let candidate = FileCandidate::from_path(&temp_dir.path().join(".."), &PlatformHidden);

        assert!(candidate.file_name.is_empty());
        assert!(candidate.name.is_empty());
    }

    // Linux filesystems accept arbitrary bytes in names, macOS ones do not.
    #[cfg(target_os = "linux")]
    #[test]
    fn test_from_path_keeps_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let raw = OsStr::from_bytes(b"caf\xE9.txt");
        fs::write(temp_dir.path().join(raw), "x").expect("Failed to write file");

        let candidates = list_candidates(temp_dir.path(), &PlatformHidden).expect("Failed to list");

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].file_name.as_os_str(), raw);
        assert_eq!(candidates[0].name, "caf\u{FFFD}.txt");
    }

    #[test]
    fn test_list_candidates_missing_dir() {
        let result = list_candidates(Path::new("/non/existent/path"), &PlatformHidden);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
