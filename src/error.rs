//! File sink error types

use std::io;
use std::path::{Path, PathBuf};

/// Categories of disk errors for user-friendly messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskErrorKind {
    /// Disk is full or quota exceeded
    DiskFull,
    /// Permission denied (read or write)
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// Other IO error
    Other,
}

impl DiskErrorKind {
    /// Get a user-friendly message for this error kind
    pub fn user_message(&self) -> &'static str {
        match self {
            DiskErrorKind::DiskFull => "disk full",
            DiskErrorKind::PermissionDenied => "permission denied",
            DiskErrorKind::NotFound => "file or directory not found",
            DiskErrorKind::Other => "I/O error",
        }
    }
}

/// Categorize an IO error into a user-friendly category
pub fn categorize_io_error(e: &io::Error) -> DiskErrorKind {
    use std::io::ErrorKind;

    match e.kind() {
        ErrorKind::StorageFull | ErrorKind::WriteZero => DiskErrorKind::DiskFull,
        ErrorKind::PermissionDenied => DiskErrorKind::PermissionDenied,
        ErrorKind::NotFound => DiskErrorKind::NotFound,
        _ => {
            #[cfg(unix)]
            {
                if let Some(os_error) = e.raw_os_error() {
                    // ENOSPC = 28; EDQUOT = 122 on Linux, 69 on macOS
                    if os_error == 28 || os_error == 122 || os_error == 69 {
                        return DiskErrorKind::DiskFull;
                    }
                    // EACCES
                    if os_error == 13 {
                        return DiskErrorKind::PermissionDenied;
                    }
                }
            }
            DiskErrorKind::Other
        }
    }
}

/// I/O faults raised by the file sink
#[derive(Debug, thiserror::Error)]
pub enum LogFileError {
    #[error("failed to create log directory {}: {source}", .path.display())]
    CreateDirectory { path: PathBuf, source: io::Error },

    #[error("failed to read log file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to open log file {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("failed to write log file {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to list log directory {}: {source}", .path.display())]
    ReadDirectory { path: PathBuf, source: io::Error },

    #[error("failed to delete log file {}: {source}", .path.display())]
    Delete { path: PathBuf, source: io::Error },
}

impl LogFileError {
    /// Path the failed operation targeted
    pub fn path(&self) -> &Path {
        match self {
            LogFileError::CreateDirectory { path, .. }
            | LogFileError::Read { path, .. }
            | LogFileError::Open { path, .. }
            | LogFileError::Write { path, .. }
            | LogFileError::ReadDirectory { path, .. }
            | LogFileError::Delete { path, .. } => path,
        }
    }

    fn source_io(&self) -> &io::Error {
        match self {
            LogFileError::CreateDirectory { source, .. }
            | LogFileError::Read { source, .. }
            | LogFileError::Open { source, .. }
            | LogFileError::Write { source, .. }
            | LogFileError::ReadDirectory { source, .. }
            | LogFileError::Delete { source, .. } => source,
        }
    }

    /// Categorized cause, for short diagnostics
    pub fn disk_kind(&self) -> DiskErrorKind {
        categorize_io_error(self.source_io())
    }

    /// One-line diagnostic suitable for the console backend
    pub fn diagnostic(&self) -> String {
        match self.disk_kind() {
            DiskErrorKind::Other => self.to_string(),
            kind => format!("{} ({})", self, kind.user_message()),
        }
    }
}

pub type Result<T> = std::result::Result<T, LogFileError>;
