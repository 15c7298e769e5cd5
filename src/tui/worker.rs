//! Background ticker for the analysis progress screen.
//!
//! The worker thread owns an [`AnalysisPipeline`], ticks it on a fixed
//! interval and forwards every event over a channel, so the TUI main loop
//! never sleeps on the animation. Dropping the handle cancels the run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::application::{AnalysisPhase, AnalysisPipeline, PipelineEvent, PipelineSchedule};
use crate::domain::{AnalysisResults, PatientData};

/// Progress updates from the analysis worker.
#[derive(Debug, Clone)]
pub enum AnalysisProgress {
    Step {
        progress: u8,
        step: usize,
        phase: AnalysisPhase,
    },
    /// Analysis finished; the engine has run.
    Complete(Box<AnalysisResults>),
}

/// Handle to a running analysis worker.
pub struct AnalysisWorkerHandle {
    progress_rx: Receiver<AnalysisProgress>,
    cancelled: Arc<AtomicBool>,
    _handle: JoinHandle<()>,
}

impl AnalysisWorkerHandle {
    /// Try to receive the next progress update (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<AnalysisProgress> {
        self.progress_rx.try_recv().ok()
    }

    /// Block until the next update or until the worker exits.
    #[must_use]
    pub fn recv_timeout(&self, timeout: Duration) -> Option<AnalysisProgress> {
        self.progress_rx.recv_timeout(timeout).ok()
    }

    /// Stop the run. No further updates are produced.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl Drop for AnalysisWorkerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Analysis worker that drives the pipeline on a timer thread.
pub struct AnalysisWorker;

impl AnalysisWorker {
    /// Start analysing `patient`, ticking every `tick_interval`.
    pub fn spawn(
        patient: PatientData,
        schedule: PipelineSchedule,
        tick_interval: Duration,
    ) -> AnalysisWorkerHandle {
        let (tx, rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));

        let mut pipeline = AnalysisPipeline::new(schedule);
        pipeline.start(patient);

        let flag = Arc::clone(&cancelled);
        let handle = thread::spawn(move || {
            Self::run(pipeline, tick_interval, &flag, &tx);
        });

        AnalysisWorkerHandle {
            progress_rx: rx,
            cancelled,
            _handle: handle,
        }
    }

    fn run(
        mut pipeline: AnalysisPipeline,
        tick_interval: Duration,
        cancelled: &AtomicBool,
        tx: &Sender<AnalysisProgress>,
    ) {
        loop {
            thread::sleep(tick_interval);

            if cancelled.load(Ordering::SeqCst) {
                pipeline.cancel();
                return;
            }

            let message = match pipeline.tick() {
                PipelineEvent::Idle => return,
                PipelineEvent::Progress {
                    progress,
                    step,
                    phase,
                } => AnalysisProgress::Step {
                    progress,
                    step,
                    phase,
                },
                PipelineEvent::Completed(results) => {
                    let _ = tx.send(AnalysisProgress::Complete(results));
                    return;
                }
            };

            if tx.send(message).is_err() {
                pipeline.cancel();
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;
    use std::collections::BTreeSet;

    fn patient() -> PatientData {
        PatientData {
            patient_id: "P-001".into(),
            name: "Jane Doe".into(),
            age: 40,
            gender: Gender::Male,
            height: 180.0,
            weight: 80.0,
            medical_history: BTreeSet::new(),
            xray: None,
        }
    }

    fn fast_schedule() -> PipelineSchedule {
        PipelineSchedule {
            ticks_to_complete: 10,
            settle_ticks: 2,
        }
    }

    #[test]
    fn test_worker_reports_progress_then_results() {
        let worker = AnalysisWorker::spawn(patient(), fast_schedule(), Duration::from_millis(1));

        let mut last_progress = 0;
        loop {
            match worker.recv_timeout(Duration::from_secs(5)) {
                Some(AnalysisProgress::Step { progress, .. }) => {
                    assert!(progress >= last_progress);
                    last_progress = progress;
                }
                Some(AnalysisProgress::Complete(results)) => {
                    assert_eq!(results.risk_score, 30);
                    break;
                }
                None => panic!("Worker stopped without results"),
            }
        }
        assert_eq!(last_progress, 100);
    }

    #[test]
    fn test_cancelled_worker_never_completes() {
        let worker = AnalysisWorker::spawn(patient(), fast_schedule(), Duration::from_millis(20));
        worker.cancel();

        while let Some(update) = worker.recv_timeout(Duration::from_millis(500)) {
            assert!(
                !matches!(update, AnalysisProgress::Complete(_)),
                "Cancelled worker produced results"
            );
        }
    }
}
