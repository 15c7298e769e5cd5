//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a medical-themed interface for:
//! - Landing screen and clinical dashboard
//! - Patient intake with X-ray attachment
//! - Timed analysis progress and imaging results
//! - Self-assessment questionnaire and risk report
//! - Recent scans and session history

mod app;
mod styles;
mod ui;
mod worker;

pub use app::App;
pub use styles::MedicalTheme;
pub use worker::{AnalysisProgress, AnalysisWorker, AnalysisWorkerHandle};
