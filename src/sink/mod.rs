//! Console/system backends
//!
//! The logger hands every formatted record to a [`ConsoleSink`]. The sink owns
//! platform-specific emission; the logger never writes to a terminal itself.

mod buffer;
mod tracing_sink;

pub use buffer::{BufferSink, BufferedRecord};
pub use tracing_sink::TracingSink;

use crate::level::Level;
use crate::metadata::Metadata;

/// Destination for formatted records
///
/// Implementations must be callable from many threads at once.
///
/// # Object Safety
/// This trait is object-safe to allow `Arc<dyn ConsoleSink>` usage.
pub trait ConsoleSink: Send + Sync {
    /// Emit a fully formatted record
    fn emit(&self, level: Level, text: &str, metadata: Option<&Metadata>);
}

impl<S: ConsoleSink + ?Sized> ConsoleSink for std::sync::Arc<S> {
    fn emit(&self, level: Level, text: &str, metadata: Option<&Metadata>) {
        (**self).emit(level, text, metadata)
    }
}
