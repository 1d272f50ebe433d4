//! In-memory record buffer
//!
//! Provides a thread-safe ring buffer sink that keeps the most recent records,
//! for in-app log viewers and for inspecting logger output.

use std::collections::VecDeque;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::level::Level;
use crate::metadata::Metadata;

use super::ConsoleSink;

/// A single captured record
#[derive(Debug, Clone, PartialEq)]
pub struct BufferedRecord {
    /// Timestamp when the record was emitted
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: Level,
    /// Formatted text
    pub text: String,
    /// Metadata attached by the caller
    pub metadata: Option<Metadata>,
}

/// Thread-safe ring buffer sink
pub struct BufferSink {
    /// All records (capped at max_records)
    records: RwLock<VecDeque<BufferedRecord>>,
    /// Maximum records to keep
    max_records: usize,
}

impl BufferSink {
    /// Create a new buffer holding at most `max_records` records
    pub fn new(max_records: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::with_capacity(max_records)),
            max_records,
        }
    }

    fn push(&self, record: BufferedRecord) {
        if let Ok(mut records) = self.records.write() {
            if records.len() >= self.max_records {
                records.pop_front();
            }
            records.push_back(record);
        }
    }

    /// Get all records as a vector
    pub fn records(&self) -> Vec<BufferedRecord> {
        self.records
            .read()
            .map(|r| r.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Texts of all records, oldest first
    pub fn texts(&self) -> Vec<String> {
        self.records
            .read()
            .map(|r| r.iter().map(|rec| rec.text.clone()).collect())
            .unwrap_or_default()
    }

    /// Get the number of records in the buffer
    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every buffered record
    pub fn clear(&self) {
        if let Ok(mut records) = self.records.write() {
            records.clear();
        }
    }
}

impl Default for BufferSink {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl ConsoleSink for BufferSink {
    fn emit(&self, level: Level, text: &str, metadata: Option<&Metadata>) {
        self.push(BufferedRecord {
            timestamp: Utc::now(),
            level,
            text: text.to_string(),
            metadata: metadata.cloned(),
        });
    }
}
