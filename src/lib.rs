//! # OsteoScan
//!
//! Osteoporosis risk evaluation workflow.
//!
//! This crate provides:
//! - A questionnaire-driven risk calculator (rule-based point accumulation)
//! - A simulated X-ray analysis pipeline with a timed progress state machine
//! - Best-effort scan history persistence to an HTTP endpoint
//! - Terminal UI for the clinical and self-assessment workflows
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (assessment input, patient intake, results)
//! - `engine`: Pure scoring functions
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (HTTP history sink, log sanitizer)
//! - `application`: Use cases, navigation state and the analysis pipeline
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod engine;
pub mod ports;
pub mod tui;

pub use config::AppConfig;
pub use domain::{AnalysisResults, AssessmentInput, PatientData, RiskLevel, RiskResult};
pub use engine::{compute_imaging_risk, compute_questionnaire_risk};

/// Result type for OsteoScan operations
pub type Result<T> = std::result::Result<T, OsteoscanError>;

/// Main error type for OsteoScan
#[derive(Debug, thiserror::Error)]
pub enum OsteoscanError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    MissingFields(#[from] domain::MissingFields),

    #[error("Upload rejected: {0}")]
    Upload(#[from] domain::UploadError),

    #[error("History persistence failed: {0}")]
    History(#[from] adapters::HistoryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
