//! Log file deletion
//!
//! Removes the contents of a log directory one entry at a time so a single
//! failure never stops the rest.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::LogFileError;

/// Outcome of a bulk deletion
#[derive(Debug, Default)]
pub struct DeletionReport {
    /// Entries that were removed
    pub deleted: Vec<PathBuf>,
    /// Entries that could not be removed, or a failure listing the directory
    pub failures: Vec<LogFileError>,
}

impl DeletionReport {
    /// True when nothing failed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Remove every entry of `dir`
///
/// A missing directory counts as already empty.
pub fn remove_dir_contents(dir: &Path) -> DeletionReport {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return DeletionReport::default(),
        Err(source) => {
            return DeletionReport {
                deleted: Vec::new(),
                failures: vec![LogFileError::ReadDirectory {
                    path: dir.to_path_buf(),
                    source,
                }],
            }
        }
    };

    let mut report = DeletionReport::default();
    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => paths.push(entry.path()),
            Err(source) => report.failures.push(LogFileError::ReadDirectory {
                path: dir.to_path_buf(),
                source,
            }),
        }
    }

    let removed = remove_paths(paths);
    report.deleted = removed.deleted;
    report.failures.extend(removed.failures);
    report
}

/// Attempt to remove each path, collecting successes and failures
pub(super) fn remove_paths(paths: impl IntoIterator<Item = PathBuf>) -> DeletionReport {
    let mut report = DeletionReport::default();

    for path in paths {
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };

        match result {
            Ok(()) => report.deleted.push(path),
            Err(source) => report.failures.push(LogFileError::Delete { path, source }),
        }
    }

    report
}
