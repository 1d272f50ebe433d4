//! Console backend built on `tracing`

use crate::level::Level;
use crate::metadata::Metadata;

use super::ConsoleSink;

/// Forwards records to the installed `tracing` subscriber
///
/// `notice` maps to INFO and `critical` to ERROR; the original level name is
/// kept in the `severity` field. Metadata is attached as a JSON string.
#[derive(Debug, Clone)]
pub struct TracingSink {
    label: String,
}

impl TracingSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

macro_rules! emit_event {
    ($lvl:expr, $label:expr, $severity:expr, $metadata:expr, $text:expr) => {
        tracing::event!(
            target: "rotalog",
            $lvl,
            label = %$label,
            severity = $severity,
            metadata = $metadata,
            "{}",
            $text
        )
    };
}

impl ConsoleSink for TracingSink {
    fn emit(&self, level: Level, text: &str, metadata: Option<&Metadata>) {
        let metadata = metadata
            .filter(|m| !m.is_empty())
            .and_then(|m| serde_json::to_string(m).ok());
        let metadata = metadata.as_deref();
        let severity = level.as_str();

        match tracing::Level::from(level) {
            tracing::Level::TRACE => {
                emit_event!(tracing::Level::TRACE, self.label, severity, metadata, text)
            }
            tracing::Level::DEBUG => {
                emit_event!(tracing::Level::DEBUG, self.label, severity, metadata, text)
            }
            tracing::Level::INFO => {
                emit_event!(tracing::Level::INFO, self.label, severity, metadata, text)
            }
            tracing::Level::WARN => {
                emit_event!(tracing::Level::WARN, self.label, severity, metadata, text)
            }
            tracing::Level::ERROR => {
                emit_event!(tracing::Level::ERROR, self.label, severity, metadata, text)
            }
        }
    }
}
