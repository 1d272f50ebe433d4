//! Logger facade
//!
//! Filters by level, formats, hands the text to the console sink and, when
//! enabled, appends it to the rotated log file. Storage faults are reported
//! through the console sink and never reach the caller.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::LoggerConfig;
use crate::error::LogFileError;
use crate::format::Formatter;
use crate::level::Level;
use crate::logfile::{self, DeletionReport, LogFile, ACTIVE_FILE_NAME};
use crate::message::Message;
use crate::metadata::Metadata;
use crate::sink::{ConsoleSink, TracingSink};

/// Leveled logger with optional line-count rotated file output
///
/// `Logger` is `Send + Sync`; share it behind an `Arc` and call it from any
/// number of threads or tasks. All file writes are serialized internally.
pub struct Logger {
    label: String,
    log_dir: PathBuf,
    max_lines: usize,
    formatter: Formatter,
    level: AtomicU8,
    write_to_file: AtomicBool,
    sink: Arc<dyn ConsoleSink>,
    /// Opened on first use of file output
    file: Mutex<Option<Arc<LogFile>>>,
}

impl Logger {
    /// Create a logger that emits through `tracing`
    pub fn new(config: LoggerConfig) -> Self {
        let sink = Arc::new(TracingSink::new(config.label.clone()));
        Self::with_sink(config, sink)
    }

    /// Create a logger with a custom console backend
    pub fn with_sink(config: LoggerConfig, sink: Arc<dyn ConsoleSink>) -> Self {
        let logger = Self {
            log_dir: config.log_dir(),
            label: config.label,
            max_lines: config.max_lines,
            formatter: Formatter::new(config.max_line_width, config.debug_output),
            level: AtomicU8::new(config.level.rank()),
            write_to_file: AtomicBool::new(config.write_to_file),
            sink,
            file: Mutex::new(None),
        };

        if config.write_to_file {
            logger.file_sink();
        }

        logger
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current level threshold
    pub fn level(&self) -> Level {
        Level::from_rank(self.level.load(Ordering::Relaxed)).unwrap_or(Level::Trace)
    }

    /// Replace the level threshold for all subsequent calls
    pub fn configure(&self, level: Level) {
        self.level.store(level.rank(), Ordering::Relaxed);
        self.console(Level::Info, &format!("Log level set to {}", level));
    }

    /// Whether records are also appended to the log file
    pub fn writes_to_file(&self) -> bool {
        self.write_to_file.load(Ordering::Relaxed)
    }

    /// Toggle file output for future calls
    pub fn set_write_to_file(&self, enabled: bool) {
        self.write_to_file.store(enabled, Ordering::Relaxed);
        if enabled {
            self.file_sink();
        }
    }

    /// Directory this logger writes its files into
    pub fn log_directory(&self) -> &Path {
        &self.log_dir
    }

    /// Path of the current log file, if file output has been opened
    pub fn current_log_file(&self) -> Option<PathBuf> {
        self.lock_file().as_ref().map(|file| file.current_path())
    }

    /// Log `message` at `level` with icons and no metadata
    pub fn log(&self, level: Level, message: impl Into<Message>) {
        self.log_with(level, message, None, true);
    }

    /// Log with optional metadata and icon control
    ///
    /// Below-threshold calls return before the message is rendered.
    pub fn log_with(
        &self,
        level: Level,
        message: impl Into<Message>,
        metadata: Option<&Metadata>,
        display_icon: bool,
    ) {
        if level < self.level() || !self.formatter.emits(level) {
            return;
        }

        let message = message.into();
        let raw = message.render();
        let Some(formatted) = self.formatter.format(level, &raw, display_icon) else {
            return;
        };
        let text = formatted.text();

        self.sink.emit(level, &text, metadata);

        if self.writes_to_file() {
            self.append_to_file(&text);
        }
    }

    pub fn trace(&self, message: impl Into<Message>) {
        self.log(Level::Trace, message);
    }

    pub fn debug(&self, message: impl Into<Message>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Into<Message>) {
        self.log(Level::Info, message);
    }

    pub fn notice(&self, message: impl Into<Message>) {
        self.log(Level::Notice, message);
    }

    pub fn warning(&self, message: impl Into<Message>) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: impl Into<Message>) {
        self.log(Level::Error, message);
    }

    pub fn critical(&self, message: impl Into<Message>) {
        self.log(Level::Critical, message);
    }

    /// Delete every file in the log directory
    ///
    /// Each file is attempted independently; failures are reported through the
    /// console sink and returned in the report.
    pub fn delete_all_log_files(&self) -> DeletionReport {
        let opened = self.lock_file().as_ref().map(Arc::clone);
        let report = match opened {
            Some(file) => file.delete_all(),
            None => logfile::remove_dir_contents(&self.log_dir),
        };

        for path in &report.deleted {
            self.console(
                Level::Info,
                &format!("Deleted log file: {}", display_name(path)),
            );
        }
        for failure in &report.failures {
            self.report(failure);
        }
        if report.is_complete() {
            self.console(Level::Info, "All log files deleted successfully.");
        }

        report
    }

    fn append_to_file(&self, text: &str) {
        let Some(file) = self.file_sink() else {
            return;
        };

        match file.append(text) {
            Ok(Some(rotated)) => self.console(
                Level::Info,
                &format!("Created new log file: {}", display_name(&rotated)),
            ),
            Ok(None) => {}
            Err(e) => self.report(&e),
        }
    }

    /// Get the file sink, opening it on first use
    ///
    /// A failed open is reported and retried on the next call.
    fn file_sink(&self) -> Option<Arc<LogFile>> {
        let mut slot = self.lock_file();
        if let Some(file) = slot.as_ref() {
            return Some(Arc::clone(file));
        }

        match LogFile::open(&self.log_dir, self.max_lines) {
            Ok(file) => {
                let current = file.current_path();
                if current.file_name().and_then(|n| n.to_str()) != Some(ACTIVE_FILE_NAME) {
                    self.console(
                        Level::Info,
                        &format!("Created new log file: {}", display_name(&current)),
                    );
                }
                let file = Arc::new(file);
                *slot = Some(Arc::clone(&file));
                Some(file)
            }
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    fn lock_file(&self) -> MutexGuard<'_, Option<Arc<LogFile>>> {
        self.file.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Console-only output; never touches the file sink
    fn console(&self, level: Level, text: &str) {
        if level >= self.level() {
            self.sink.emit(level, text, None);
        }
    }

    fn report(&self, error: &LogFileError) {
        self.console(Level::Error, &error.diagnostic());
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logfile::ROTATION_MARKER_PREFIX;
    use crate::sink::BufferSink;
    use std::collections::HashSet;
    use std::fs;
    use std::sync::atomic::AtomicUsize;
    use tempfile::TempDir;

    fn test_logger(temp_dir: &TempDir, config: LoggerConfig) -> (Logger, Arc<BufferSink>) {
        let sink = Arc::new(BufferSink::default());
        let config = config.with_base_dir(temp_dir.path()).with_debug_output(true);
        let logger = Logger::with_sink(config, sink.clone());
        (logger, sink)
    }

    fn log_files(logger: &Logger) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = fs::read_dir(logger.log_directory())
            .map(|rd| rd.map(|e| e.unwrap().path()).collect())
            .unwrap_or_default();
        files.sort();
        files
    }

    fn record_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .filter(|l| !l.starts_with(ROTATION_MARKER_PREFIX))
            .map(str::to_string)
            .collect()
    }

    fn all_record_lines(logger: &Logger) -> Vec<String> {
        log_files(logger).iter().flat_map(|f| record_lines(f)).collect()
    }

    #[test]
    fn test_threshold_filters_inclusively() {
        let temp_dir = TempDir::new().unwrap();

        for threshold in Level::ALL {
            let config = LoggerConfig::new(format!("t{}", threshold.rank()))
                .with_level(threshold)
                .with_write_to_file(true);
            let (logger, sink) = test_logger(&temp_dir, config);

            for level in Level::ALL {
                let before_console = sink.len();
                let before_file = all_record_lines(&logger).len();

                logger.log_with(level, "sample", None, false);

                let forwarded = level >= threshold;
                assert_eq!(sink.len() > before_console, forwarded, "{level} vs {threshold}");
                assert_eq!(
                    all_record_lines(&logger).len() > before_file,
                    forwarded,
                    "{level} vs {threshold}"
                );
            }
        }
    }

    #[test]
    fn test_filtered_message_is_never_rendered() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, _sink) = test_logger(
            &temp_dir,
            LoggerConfig::new("lazy").with_level(Level::Error),
        );

        let renders = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&renders);
        logger.info(Message::lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            "expensive".to_string()
        }));

        assert_eq!(renders.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_debug_suppressed_without_debug_output() {
        let temp_dir = TempDir::new().unwrap();
        let sink = Arc::new(BufferSink::default());
        let config = LoggerConfig::new("release")
            .with_level(Level::Trace)
            .with_write_to_file(true)
            .with_base_dir(temp_dir.path())
            .with_debug_output(false);
        let logger = Logger::with_sink(config, sink.clone());

        logger.debug("hidden");

        assert!(sink.is_empty());
        assert!(all_record_lines(&logger).is_empty());
    }

    #[test]
    fn test_debug_wrapped_when_enabled() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, sink) = test_logger(
            &temp_dir,
            LoggerConfig::new("dbg").with_level(Level::Trace),
        );

        logger.log_with(Level::Debug, "state", None, false);

        let texts = sink.texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].starts_with(crate::format::DEBUG_DIVIDER));
        assert!(texts[0].contains("\nstate\n"));
    }

    #[test]
    fn test_error_uppercased_on_console_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, sink) = test_logger(
            &temp_dir,
            LoggerConfig::new("loud").with_level(Level::Trace).with_write_to_file(true),
        );

        logger.log_with(Level::Error, "log message 1", None, false);
        logger.log_with(Level::Info, "log message 2", None, false);

        assert_eq!(sink.texts(), vec!["LOG MESSAGE 1", "log message 2"]);
        assert_eq!(all_record_lines(&logger), vec!["LOG MESSAGE 1", "log message 2"]);
    }

    #[test]
    fn test_icons_prefix_text() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, sink) = test_logger(&temp_dir, LoggerConfig::new("icons"));

        logger.warning("careful");

        assert_eq!(sink.texts(), vec![format!("{} careful", Level::Warning.icon())]);
    }

    #[test]
    fn test_pagination_applies_to_output() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, sink) = test_logger(
            &temp_dir,
            LoggerConfig::new("narrow").with_max_line_width(10),
        );

        logger.log_with(Level::Info, "alpha beta gamma delta", None, false);

        assert_eq!(sink.texts(), vec!["alpha beta\ngamma\ndelta"]);
    }

    #[test]
    fn test_metadata_reaches_console_only() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, sink) = test_logger(
            &temp_dir,
            LoggerConfig::new("meta").with_write_to_file(true),
        );
        let metadata = crate::metadata! { "messageType" => "Test", "error" => "Error" };

        logger.log_with(Level::Error, "Failed to encode DirectMessage", Some(&metadata), false);

        let records = sink.records();
        assert_eq!(records[0].metadata.as_ref(), Some(&metadata));
        assert_eq!(all_record_lines(&logger), vec!["FAILED TO ENCODE DIRECTMESSAGE"]);
    }

    #[test]
    fn test_configure_changes_threshold() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, sink) = test_logger(
            &temp_dir,
            LoggerConfig::new("cfg").with_level(Level::Error),
        );

        logger.log_with(Level::Info, "dropped", None, false);
        assert!(sink.is_empty());

        logger.configure(Level::Info);
        assert_eq!(logger.level(), Level::Info);
        logger.log_with(Level::Info, "kept", None, false);

        assert_eq!(sink.texts(), vec!["Log level set to info", "kept"]);
    }

    #[test]
    fn test_toggle_file_writing() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, _sink) = test_logger(&temp_dir, LoggerConfig::new("toggle"));

        logger.log_with(Level::Info, "console only", None, false);
        assert!(!logger.log_directory().exists());
        assert!(logger.current_log_file().is_none());

        logger.set_write_to_file(true);
        assert!(logger.writes_to_file());
        logger.log_with(Level::Info, "to file", None, false);

        logger.set_write_to_file(false);
        logger.log_with(Level::Info, "console again", None, false);

        assert_eq!(
            logger.current_log_file(),
            Some(logger.log_directory().join(ACTIVE_FILE_NAME))
        );
        assert_eq!(all_record_lines(&logger), vec!["to file"]);
    }

    #[test]
    fn test_rotation_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, sink) = test_logger(
            &temp_dir,
            LoggerConfig::new("e2e").with_max_lines(5).with_write_to_file(true),
        );
        let first = logger.current_log_file().unwrap();

        for i in 0..5 {
            logger.log_with(Level::Info, format!("M{}", i), None, false);
        }
        let before = fs::read(&first).unwrap();
        for i in 5..12 {
            logger.log_with(Level::Info, format!("M{}", i), None, false);
        }

        let files = log_files(&logger);
        assert_eq!(files.len(), 3);
        assert_eq!(fs::read(&first).unwrap(), before);

        let mut groups: Vec<Vec<String>> = files.iter().map(|f| record_lines(f)).collect();
        groups.sort_by_key(|g| g[0][1..].parse::<usize>().unwrap());
        assert_eq!(
            groups,
            vec![
                vec!["M0", "M1", "M2", "M3", "M4"],
                vec!["M5", "M6", "M7", "M8", "M9"],
                vec!["M10", "M11"],
            ]
        );

        let rotations = sink
            .texts()
            .iter()
            .filter(|t| t.starts_with("Created new log file: logs_"))
            .count();
        assert_eq!(rotations, 2);
    }

    #[test]
    fn test_delete_all_then_recreate() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, sink) = test_logger(
            &temp_dir,
            LoggerConfig::new("wipe").with_max_lines(2).with_write_to_file(true),
        );
        for i in 0..5 {
            logger.log_with(Level::Info, format!("line {}", i), None, false);
        }
        assert_eq!(log_files(&logger).len(), 3);

        let report = logger.delete_all_log_files();
        assert!(report.is_complete());
        assert_eq!(report.deleted.len(), 3);
        assert!(log_files(&logger).is_empty());
        assert!(sink
            .texts()
            .contains(&"All log files deleted successfully.".to_string()));

        logger.log_with(Level::Info, "fresh", None, false);
        assert_eq!(log_files(&logger), vec![logger.log_directory().join(ACTIVE_FILE_NAME)]);
        assert_eq!(all_record_lines(&logger), vec!["fresh"]);
    }

    #[test]
    fn test_delete_without_file_output() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, _sink) = test_logger(&temp_dir, LoggerConfig::new("unopened"));
        fs::create_dir_all(logger.log_directory()).unwrap();
        fs::write(logger.log_directory().join("logs.txt"), "old\n").unwrap();

        let report = logger.delete_all_log_files();

        assert_eq!(report.deleted.len(), 1);
        assert!(log_files(&logger).is_empty());
    }

    #[test]
    fn test_storage_fault_is_reported_not_raised() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let sink = Arc::new(BufferSink::default());
        let config = LoggerConfig::new("broken")
            .with_base_dir(&blocker)
            .with_write_to_file(true);
        let logger = Logger::with_sink(config, sink.clone());
        let errors = || {
            sink.records()
                .iter()
                .filter(|r| r.level == Level::Error)
                .count()
        };
        assert_eq!(errors(), 1);

        logger.log_with(Level::Info, "still works", None, false);

        let texts = sink.texts();
        assert!(texts.contains(&"still works".to_string()));
        // Construction failure plus one fresh attempt for the call
        let failures = texts
            .iter()
            .filter(|t| t.starts_with("failed to create log directory"))
            .count();
        assert_eq!(failures, 2);
        assert_eq!(errors(), 2);
        assert!(logger.current_log_file().is_none());
    }

    #[test]
    fn test_reopen_full_file_rotates_immediately() {
        let temp_dir = TempDir::new().unwrap();
        let config = LoggerConfig::new("restart").with_max_lines(3).with_write_to_file(true);

        let (logger, _sink) = test_logger(&temp_dir, config.clone());
        for i in 0..3 {
            logger.log_with(Level::Info, format!("r{}", i), None, false);
        }
        drop(logger);

        let (reopened, sink) = test_logger(&temp_dir, config);
        let current = reopened.current_log_file().unwrap();
        assert_ne!(current.file_name().unwrap(), ACTIVE_FILE_NAME);
        assert!(sink.texts()[0].starts_with("Created new log file: logs_"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, sink) = test_logger(
            &temp_dir,
            LoggerConfig::new("concurrent")
                .with_level(Level::Trace)
                .with_max_lines(64)
                .with_write_to_file(true),
        );
        let logger = Arc::new(logger);
        let tasks = 40;
        let per_task = 25;

        let mut handles = Vec::new();
        for t in 0..tasks {
            let logger = Arc::clone(&logger);
            handles.push(tokio::spawn(async move {
                for i in 0..per_task {
                    logger.log_with(Level::Notice, format!("LOG MESSAGE {} {}", t, i), None, false);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let lines = all_record_lines(&logger);
        assert_eq!(lines.len(), tasks * per_task);
        let unique: HashSet<&String> = lines.iter().collect();
        assert_eq!(unique.len(), tasks * per_task);
        for file in log_files(&logger) {
            assert!(record_lines(&file).len() <= 64);
        }

        let notices = sink
            .records()
            .iter()
            .filter(|r| r.level == Level::Notice)
            .count();
        assert_eq!(notices, tasks * per_task);
    }
}
