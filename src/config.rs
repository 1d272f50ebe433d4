//! Logger configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::format::DEFAULT_MAX_LINE_WIDTH;
use crate::level::Level;

/// Default number of records per log file before rotating
pub const DEFAULT_MAX_LINES: usize = 1000;

/// Default logger label
pub const DEFAULT_LABEL: &str = "rotalog";

/// Construction-time configuration for a [`Logger`](crate::Logger)
///
/// Only the level and the write-to-file flag can change after construction,
/// through the logger's own setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Logger name; also names the log subdirectory
    #[serde(default = "default_label")]
    pub label: String,

    /// Initial level threshold (inclusive)
    #[serde(default = "default_level")]
    pub level: Level,

    /// Records per log file before rotating (default: 1000)
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// Pagination width in characters (default: 80)
    #[serde(default = "default_max_line_width")]
    pub max_line_width: usize,

    /// Also append records to the log file (default: off)
    #[serde(default)]
    pub write_to_file: bool,

    /// Emit `debug` records; defaults to on in debug builds only
    #[serde(default = "default_debug_output")]
    pub debug_output: bool,

    /// Writable base directory; `None` resolves a per-user data directory
    #[serde(default)]
    pub base_dir: Option<PathBuf>,
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn default_level() -> Level {
    Level::Debug
}

fn default_max_lines() -> usize {
    DEFAULT_MAX_LINES
}

fn default_max_line_width() -> usize {
    DEFAULT_MAX_LINE_WIDTH
}

fn default_debug_output() -> bool {
    cfg!(debug_assertions)
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            level: default_level(),
            max_lines: default_max_lines(),
            max_line_width: default_max_line_width(),
            write_to_file: false,
            debug_output: default_debug_output(),
            base_dir: None,
        }
    }
}

impl LoggerConfig {
    /// Create a configuration with defaults and the given label
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub fn with_max_line_width(mut self, width: usize) -> Self {
        self.max_line_width = width;
        self
    }

    pub fn with_write_to_file(mut self, enabled: bool) -> Self {
        self.write_to_file = enabled;
        self
    }

    pub fn with_debug_output(mut self, enabled: bool) -> Self {
        self.debug_output = enabled;
        self
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Directory holding this logger's files: `<base>/<sanitized label>`
    pub fn log_dir(&self) -> PathBuf {
        let base = self.base_dir.clone().unwrap_or_else(default_base_dir);
        base.join(label_dir_name(&self.label))
    }
}

/// Get the per-user writable base directory for log files
/// Falls back to the current directory if no platform directory is available
pub fn default_base_dir() -> PathBuf {
    try_default_base_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine a data directory, writing logs under the current directory");
        PathBuf::from(".")
    })
}

/// Try to resolve the platform data directory, then the documents directory
pub fn try_default_base_dir() -> Option<PathBuf> {
    dirs::data_local_dir().or_else(dirs::document_dir)
}

/// Turn a label into a single safe path component
pub fn label_dir_name(label: &str) -> String {
    let name: String = label
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match name.as_str() {
        "" | "." | ".." => DEFAULT_LABEL.to_string(),
        _ => name,
    }
}
