//! History service: Fire-and-forget delivery of scan summaries.
//!
//! Delivery never blocks the caller, is never retried and never reports
//! failure back to the UI. A failed POST only produces a `warn!` line.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::domain::{HistoryEntry, StoredScan};
use crate::ports::HistorySink;

/// Hands scan summaries to a [`HistorySink`] on a detached thread.
pub struct HistoryService<H: HistorySink> {
    sink: Option<Arc<H>>,
}

impl<H: HistorySink + 'static> HistoryService<H> {
    /// Create a service delivering to `sink`.
    pub fn new(sink: Arc<H>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Create a service that drops every entry.
    #[must_use]
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Send the scan's summary in the background.
    ///
    /// The returned handle may be ignored; it exists so callers (and tests)
    /// can wait for the attempt to finish.
    pub fn persist(&self, scan: &StoredScan) -> PersistHandle {
        let Some(sink) = self.sink.as_ref().map(Arc::clone) else {
            tracing::debug!("History disabled; scan summary not sent");
            return PersistHandle { thread: None };
        };

        let entry = scan.entry.clone();
        let spawned = thread::Builder::new()
            .name("history-post".into())
            .spawn(move || deliver(sink.as_ref(), &entry));

        match spawned {
            Ok(thread) => PersistHandle {
                thread: Some(thread),
            },
            Err(e) => {
                tracing::warn!("Failed to spawn history thread: {e}");
                PersistHandle { thread: None }
            }
        }
    }
}

fn deliver<H: HistorySink>(sink: &H, entry: &HistoryEntry) -> bool {
    match sink.record(entry) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Failed to save scan history: {e}");
            false
        }
    }
}

/// Handle to one in-flight history delivery.
#[derive(Debug)]
pub struct PersistHandle {
    thread: Option<JoinHandle<bool>>,
}

impl PersistHandle {
    /// Block until the attempt finishes. Returns whether the entry was delivered.
    pub fn wait(self) -> bool {
        self.thread
            .map(|t| t.join().unwrap_or(false))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AnalysisResults, BoneAnalysis, Gender, ImagingRecommendations, ImagingStage, PatientData,
    };
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        entries: Mutex<Vec<HistoryEntry>>,
    }

    impl HistorySink for RecordingSink {
        type Error = std::io::Error;

        fn record(&self, entry: &HistoryEntry) -> Result<(), Self::Error> {
            self.entries
                .lock()
                .map_err(|_| std::io::Error::other("poisoned"))?
                .push(entry.clone());
            Ok(())
        }
    }

    struct FailingSink;

    impl HistorySink for FailingSink {
        type Error = std::io::Error;

        fn record(&self, _entry: &HistoryEntry) -> Result<(), Self::Error> {
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))
        }
    }

    fn scan() -> StoredScan {
        let results = AnalysisResults {
            patient_data: PatientData {
                patient_id: "P-001".into(),
                name: "Jane Doe".into(),
                age: 68,
                gender: Gender::Female,
                height: 160.0,
                weight: 60.0,
                medical_history: BTreeSet::new(),
                xray: None,
            },
            risk_score: 55,
            risk_level: ImagingStage::Osteopenia,
            confidence: 90.0,
            stage: "Osteopenia".into(),
            recommendations: ImagingRecommendations::default(),
            analysis: BoneAnalysis {
                bone_mineral: 22.5,
                trabecular: 38.0,
                cortical: 51.7,
            },
            heatmap: String::new(),
        };
        StoredScan::with_id("scan-1", "1/2/2026, 3:04:05 PM", results)
    }

    #[test]
    fn test_persist_delivers_entry() {
        let sink = Arc::new(RecordingSink::default());
        let service = HistoryService::new(Arc::clone(&sink));

        assert!(service.persist(&scan()).wait());

        let entries = sink.entries.lock().expect("Should lock");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "scan-1");
        assert_eq!(entries[0].stage, "Osteopenia");
    }

    #[test]
    fn test_failure_is_swallowed() {
        let service = HistoryService::new(Arc::new(FailingSink));
        assert!(!service.persist(&scan()).wait());
    }

    #[test]
    fn test_disabled_service_sends_nothing() {
        let service = HistoryService::<RecordingSink>::disabled();
        assert!(!service.is_enabled());
        assert!(!service.persist(&scan()).wait());
    }
}
