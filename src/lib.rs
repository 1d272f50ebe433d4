//! Rotalog - leveled logging with paginated output and rotated log files
//!
//! A [`Logger`] filters records by [`Level`], formats them (icons, pagination,
//! upper-casing for errors), hands them to a [`ConsoleSink`] and optionally
//! appends them to a line-count rotated [`LogFile`].

pub mod config;
pub mod error;
pub mod format;
pub mod level;
pub mod logfile;
pub mod logger;
pub mod message;
pub mod metadata;
pub mod sink;

pub use config::LoggerConfig;
pub use error::{DiskErrorKind, LogFileError};
pub use format::{FormattedMessage, Formatter};
pub use level::Level;
pub use logfile::{DeletionReport, LogFile};
pub use logger::Logger;
pub use message::Message;
pub use metadata::{Metadata, MetadataValue};
pub use sink::{BufferSink, ConsoleSink, TracingSink};
