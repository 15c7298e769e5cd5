//! Analysis pipeline: Tick-driven state machine behind the progress screen.
//!
//! The pipeline owns the submitted patient until the animation finishes,
//! then runs the imaging engine exactly once and hands back the results.
//! Cancelling drops the patient, so a cancelled run can never complete.

use crate::domain::{AnalysisResults, PatientData};
use crate::engine::compute_imaging_risk;

/// One row of the step timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisStep {
    pub title: &'static str,
    pub description: &'static str,
}

pub const ANALYSIS_STEPS: [AnalysisStep; 5] = [
    AnalysisStep {
        title: "Preprocessing X-ray",
        description: "Normalizing image, enhancing contrast, and extracting ROI",
    },
    AnalysisStep {
        title: "AI Model Inference",
        description: "Running deep learning model on image features",
    },
    AnalysisStep {
        title: "Generating Heatmap",
        description: "Creating Grad-CAM visualization for explainability",
    },
    AnalysisStep {
        title: "Clinical Analysis",
        description: "Combining imaging results with patient data",
    },
    AnalysisStep {
        title: "Generating Report",
        description: "Compiling results and recommendations",
    },
];

/// Pipeline state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisPhase {
    #[default]
    Idle,
    Preprocessing,
    Inferring,
    Generating,
    Finalizing,
    Done,
}

impl AnalysisPhase {
    /// Phase shown while the timeline is on `step`.
    #[must_use]
    pub fn for_step(step: usize) -> Self {
        match step {
            0 => Self::Preprocessing,
            1 => Self::Inferring,
            2 | 3 => Self::Generating,
            _ => Self::Finalizing,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !matches!(self, Self::Idle | Self::Done)
    }
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Preprocessing => write!(f, "Preprocessing"),
            Self::Inferring => write!(f, "Inferring"),
            Self::Generating => write!(f, "Generating"),
            Self::Finalizing => write!(f, "Finalizing"),
            Self::Done => write!(f, "Done"),
        }
    }
}

/// Tick counts for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSchedule {
    /// Ticks from 0% to 100%
    pub ticks_to_complete: u32,
    /// Ticks spent at 100% before results are produced
    pub settle_ticks: u32,
}

impl Default for PipelineSchedule {
    fn default() -> Self {
        Self {
            ticks_to_complete: 100,
            settle_ticks: 10,
        }
    }
}

/// Outcome of a single tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Nothing is running (never started, cancelled, or already done).
    Idle,
    Progress {
        /// Percent complete, 0..=100
        progress: u8,
        /// Index into [`ANALYSIS_STEPS`]
        step: usize,
        phase: AnalysisPhase,
    },
    Completed(Box<AnalysisResults>),
}

/// Tick-driven analysis state machine.
#[derive(Debug, Default)]
pub struct AnalysisPipeline {
    schedule: PipelineSchedule,
    phase: AnalysisPhase,
    elapsed: u32,
    settle_remaining: u32,
    pending: Option<PatientData>,
}

impl AnalysisPipeline {
    #[must_use]
    pub fn new(schedule: PipelineSchedule) -> Self {
        Self {
            schedule: PipelineSchedule {
                ticks_to_complete: schedule.ticks_to_complete.max(1),
                settle_ticks: schedule.settle_ticks,
            },
            ..Self::default()
        }
    }

    /// Begin a run for `patient`, replacing any run in progress.
    pub fn start(&mut self, patient: PatientData) {
        self.elapsed = 0;
        self.settle_remaining = self.schedule.settle_ticks;
        self.phase = AnalysisPhase::Preprocessing;
        self.pending = Some(patient);
        tracing::debug!("Analysis pipeline started");
    }

    /// Advance by one tick.
    pub fn tick(&mut self) -> PipelineEvent {
        if self.pending.is_none() {
            return PipelineEvent::Idle;
        }

        if self.elapsed < self.schedule.ticks_to_complete {
            self.elapsed += 1;
            return self.progress_event();
        }

        if self.settle_remaining > 0 {
            self.settle_remaining -= 1;
            if self.settle_remaining > 0 {
                return self.progress_event();
            }
        }

        let Some(patient) = self.pending.take() else {
            return PipelineEvent::Idle;
        };
        self.phase = AnalysisPhase::Done;

        let results = compute_imaging_risk(&patient);
        tracing::info!(
            "Analysis complete: stage={}, score={}, confidence={:.1}%",
            results.risk_level,
            results.risk_score,
            results.confidence
        );
        PipelineEvent::Completed(Box::new(results))
    }

    /// Abandon the run. Later ticks are no-ops and no results are produced.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("Analysis pipeline cancelled at {}%", self.progress());
        }
        self.phase = AnalysisPhase::Idle;
    }

    /// Percent complete, 0..=100.
    #[must_use]
    pub fn progress(&self) -> u8 {
        let pct = u64::from(self.elapsed) * 100 / u64::from(self.schedule.ticks_to_complete);
        u8::try_from(pct.min(100)).unwrap_or(100)
    }

    /// Index of the timeline step currently shown.
    #[must_use]
    pub fn current_step(&self) -> usize {
        (usize::from(self.progress()) / 20).min(ANALYSIS_STEPS.len() - 1)
    }

    #[must_use]
    pub fn phase(&self) -> AnalysisPhase {
        self.phase
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    fn progress_event(&mut self) -> PipelineEvent {
        let step = self.current_step();
        let phase = AnalysisPhase::for_step(step);
        if phase != self.phase {
            tracing::debug!("Analysis phase: {} -> {}", self.phase, phase);
            self.phase = phase;
        }
        PipelineEvent::Progress {
            progress: self.progress(),
            step,
            phase,
        }
    }
}
