//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod assessment;
mod history;
mod navigator;
mod pipeline;

pub use assessment::AssessmentService;
pub use history::{HistoryService, PersistHandle};
pub use navigator::{AppState, View, RECENT_SCAN_LIMIT};
pub use pipeline::{
    AnalysisPhase, AnalysisPipeline, AnalysisStep, PipelineEvent, PipelineSchedule,
    ANALYSIS_STEPS,
};
