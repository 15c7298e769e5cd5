//! History port: Trait for recording completed scans outside the process.
//!
//! Implementations are called from a detached background thread and their
//! errors are only logged, so a sink never needs to retry or buffer.

use crate::domain::HistoryEntry;

/// Destination for scan history summaries.
pub trait HistorySink: Send + Sync {
    /// Error type for sink operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Record one scan summary.
    ///
    /// # Errors
    /// Returns error if the summary could not be delivered.
    fn record(&self, entry: &HistoryEntry) -> Result<(), Self::Error>;
}
