//! File sink
//!
//! Append-only log files with line-count rotation. The active file starts as
//! `logs.txt`; each rotation creates `logs_<timestamp>.txt`, writes a marker
//! line and makes it the current file. Old files are never modified.

mod cleanup;
mod writer;

pub use cleanup::{remove_dir_contents, DeletionReport};
pub use writer::{rotated_file_name, LogFile, ACTIVE_FILE_NAME, ROTATION_MARKER_PREFIX};
