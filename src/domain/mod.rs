//! Domain layer: Core business types.
//!
//! Plain data types for both workflows plus the validation that guards them.
//! Scoring lives in `crate::engine`.

mod assessment;
mod imaging;
mod patient;
mod risk;
mod scan;
mod upload;

pub use assessment::{
    body_mass_index, AlcoholConsumption, AssessmentDraft, AssessmentInput, Gender, IntakeLevel,
    MenopauseStatus, PhysicalActivity, SmokingStatus, CHRONIC_DISEASES, MEDICATIONS,
};
pub use imaging::{AnalysisResults, BoneAnalysis, ImagingRecommendations, ImagingStage};
pub use patient::{PatientData, PatientDraft, MEDICAL_HISTORY};
pub use risk::{Recommendations, RiskLevel, RiskResult};
pub use scan::{HistoryEntry, ScanRisk, StoredScan};
pub use upload::{mime_from_name, UploadError, XrayFile, ACCEPTED_MIME_TYPES, UNSUPPORTED_TYPE_MESSAGE};

/// Required form fields that were left empty at submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing required fields: {}", .fields.join(", "))]
pub struct MissingFields {
    pub fields: Vec<&'static str>,
}

impl MissingFields {
    #[must_use]
    pub fn new(fields: Vec<&'static str>) -> Self {
        Self { fields }
    }
}
