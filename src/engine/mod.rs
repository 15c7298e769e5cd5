//! Risk scoring engine.
//!
//! Pure functions from a domain input to a result. Nothing here reads
//! configuration, logs, or touches application state, so every entry point is
//! safe to call from any thread.

mod imaging;
mod questionnaire;
mod recommendations;

pub use imaging::{
    bone_analysis, compute_imaging_risk, compute_imaging_risk_with_rng, imaging_score,
    recommendations_for, BASE_SCORE, PLACEHOLDER_HEATMAP,
};
pub use questionnaire::{compute_questionnaire_risk, MAX_SCORE};
pub use recommendations::generate_recommendations;
