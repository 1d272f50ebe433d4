//! Line-count rotated log file
//!
//! The current path and its record count live behind one mutex. An append
//! holds it across "check count, maybe rotate, write" so concurrent writers
//! can never both see a file as not yet full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, Utc};

use crate::error::{LogFileError, Result};

use super::cleanup::{self, DeletionReport};

/// Name of the file a fresh log directory starts with
pub const ACTIVE_FILE_NAME: &str = "logs.txt";

/// First line of every rotated file
pub const ROTATION_MARKER_PREFIX: &str = "New log file created on ";

/// File name for a file rotated in at `at`
///
/// Sortable, second resolution, no colons.
pub fn rotated_file_name(at: DateTime<Utc>) -> String {
    format!("logs_{}.txt", at.format("%Y-%m-%dT%H-%M-%SZ"))
}

#[derive(Debug)]
struct State {
    path: PathBuf,
    /// Record lines in `path`, excluding the rotation marker
    lines: usize,
}

/// A directory of rotated log files with one current file
#[derive(Debug)]
pub struct LogFile {
    dir: PathBuf,
    max_lines: usize,
    state: Mutex<State>,
}

impl LogFile {
    /// Open the log directory, reusing `logs.txt` if present
    ///
    /// Creates the directory and an empty `logs.txt` as needed. If the
    /// existing file already holds `max_lines` records it is rotated away
    /// immediately.
    pub fn open(dir: impl Into<PathBuf>, max_lines: usize) -> Result<Self> {
        let dir = dir.into();
        let max_lines = max_lines.max(1);

        create_dir(&dir)?;

        let path = dir.join(ACTIVE_FILE_NAME);
        let lines = if path.exists() {
            count_record_lines(&path)?
        } else {
            touch(&path)?;
            0
        };

        let log_file = Self {
            dir,
            max_lines,
            state: Mutex::new(State { path, lines }),
        };

        if lines >= max_lines {
            let mut state = log_file.lock();
            log_file.rotate_locked(&mut state)?;
        }

        Ok(log_file)
    }

    /// Path of the file the next append goes to
    pub fn current_path(&self) -> PathBuf {
        self.lock().path.clone()
    }

    /// Record lines in the current file
    pub fn line_count(&self) -> usize {
        self.lock().lines
    }

    /// Append `text` plus a newline, rotating first if the current file is full
    ///
    /// Returns the new file's path when this append triggered a rotation.
    pub fn append(&self, text: &str) -> Result<Option<PathBuf>> {
        let mut state = self.lock();

        // Deleted underneath us: start over with an empty file
        if !state.path.exists() {
            create_dir(&self.dir)?;
            state.lines = 0;
        }

        let rotated = if state.lines >= self.max_lines {
            Some(self.rotate_locked(&mut state)?)
        } else {
            None
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&state.path)
            .map_err(|source| LogFileError::Open {
                path: state.path.clone(),
                source,
            })?;

        let mut record = String::with_capacity(text.len() + 1);
        record.push_str(text);
        record.push('\n');
        file.write_all(record.as_bytes())
            .map_err(|source| LogFileError::Write {
                path: state.path.clone(),
                source,
            })?;

        state.lines += text.split('\n').count();
        Ok(rotated)
    }

    /// Start a new current file now, regardless of the line count
    pub fn rotate(&self) -> Result<PathBuf> {
        let mut state = self.lock();
        self.rotate_locked(&mut state)
    }

    /// Remove every file in the log directory
    ///
    /// Each removal is attempted independently. Afterwards the next append
    /// recreates `logs.txt`.
    pub fn delete_all(&self) -> DeletionReport {
        let mut state = self.lock();
        let report = cleanup::remove_dir_contents(&self.dir);
        state.path = self.dir.join(ACTIVE_FILE_NAME);
        state.lines = 0;
        report
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // State stays valid even if a writer panicked
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn rotate_locked(&self, state: &mut State) -> Result<PathBuf> {
        let now = Utc::now();
        let base = rotated_file_name(now);
        let mut path = self.dir.join(&base);
        // `_` sorts after `.`, so a same-second name still lists after the first
        let mut suffix = 1;
        while path.exists() {
            let stem = base.trim_end_matches(".txt");
            path = self.dir.join(format!("{}_{:03}.txt", stem, suffix));
            suffix += 1;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| LogFileError::Open {
                path: path.clone(),
                source,
            })?;

        let marker = format!(
            "{}{}\n",
            ROTATION_MARKER_PREFIX,
            now.with_timezone(&Local).to_rfc2822()
        );
        file.write_all(marker.as_bytes())
            .map_err(|source| LogFileError::Write {
                path: path.clone(),
                source,
            })?;

        state.path = path.clone();
        state.lines = 0;
        Ok(path)
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| LogFileError::CreateDirectory {
        path: dir.to_path_buf(),
        source,
    })
}

fn touch(path: &Path) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|source| LogFileError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Count record lines, skipping a leading rotation marker
fn count_record_lines(path: &Path) -> Result<usize> {
    let contents = fs::read_to_string(path).map_err(|source| LogFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(contents
        .lines()
        .enumerate()
        .filter(|(i, line)| !(*i == 0 && line.starts_with(ROTATION_MARKER_PREFIX)))
        .count())
}
