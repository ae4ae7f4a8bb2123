//! Check-script discovery.
//!
//! Scans exactly one directory level for `.rill` files whose stem matches
//! one of two naming patterns: the `test_` prefix or the `_test` suffix.
//! The returned order is deterministic: the prefix group sorted by file
//! name, then the suffix group sorted by file name. A stem matching both
//! patterns lands in the prefix group only, so every file is reported once.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::errors::{unspanned, ErrorKind, RillError, SourceContext};

/// File extension recognized as a check script.
pub const CHECK_FILE_EXTENSION: &str = "rill";

/// Which naming convention a discovered file matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePattern {
    /// `test_*.rill`
    TestPrefix,
    /// `*_test.rill`
    TestSuffix,
}

/// A discovered check script. Immutable once discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFile {
    pub path: PathBuf,
    pub pattern: NamePattern,
}

/// Returns the pattern a path matches, or `None` if it is not a check
/// script.
pub fn pattern_for(path: &Path) -> Option<NamePattern> {
    if !path
        .extension()
        .is_some_and(|ext| ext == CHECK_FILE_EXTENSION)
    {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.starts_with("test_") {
        Some(NamePattern::TestPrefix)
    } else if stem.ends_with("_test") {
        Some(NamePattern::TestSuffix)
    } else {
        None
    }
}

/// Scans `root` (one level deep, no recursion) for check scripts.
///
/// An unreadable root directory is the one fatal condition of a run: the
/// error propagates instead of being folded into a per-file result.
pub fn discover_check_files(root: &Path) -> Result<Vec<CheckFile>, RillError> {
    let mut prefixed = Vec::new();
    let mut suffixed = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            RillError::new(
                ErrorKind::Io {
                    message: format!("failed to read check directory '{}': {e}", root.display()),
                },
                &SourceContext::fallback("check discovery"),
                unspanned(),
            )
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        match pattern_for(path) {
            Some(NamePattern::TestPrefix) => prefixed.push(path.to_path_buf()),
            Some(NamePattern::TestSuffix) => suffixed.push(path.to_path_buf()),
            None => {}
        }
    }

    prefixed.sort();
    suffixed.sort();

    let files = prefixed
        .into_iter()
        .map(|path| CheckFile {
            path,
            pattern: NamePattern::TestPrefix,
        })
        .chain(suffixed.into_iter().map(|path| CheckFile {
            path,
            pattern: NamePattern::TestSuffix,
        }))
        .collect();
    Ok(files)
}
