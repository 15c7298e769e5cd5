//! Imaging analysis result types.
//!
//! Represents the output of the simulated X-ray analysis.

use serde::{Deserialize, Serialize};

use super::patient::PatientData;

/// Bone health stage reported by the imaging analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImagingStage {
    Normal,
    Osteopenia,
    Osteoporosis,
}

impl ImagingStage {
    /// Map an accumulated score onto a stage. Lower bounds are inclusive.
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        if score >= 70 {
            Self::Osteoporosis
        } else if score >= 45 {
            Self::Osteopenia
        } else {
            Self::Normal
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Normal => "Bone density appears normal for patient age and demographics. Continue preventive measures.",
            Self::Osteopenia => "Low bone mass detected (T-score between -1.0 and -2.5). Preventive intervention recommended.",
            Self::Osteoporosis => "Osteoporosis detected (T-score ≤ -2.5). Immediate medical intervention required.",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Osteopenia => "Osteopenia",
            Self::Osteoporosis => "Osteoporosis",
        }
    }
}

impl std::fmt::Display for ImagingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Follow-up advice keyed by stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagingRecommendations {
    pub medical: Vec<String>,
    pub lifestyle: Vec<String>,
    pub follow_up: Vec<String>,
}

/// Sub-scores shown as bars on the results screen (percent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoneAnalysis {
    pub bone_mineral: f64,
    pub trabecular: f64,
    pub cortical: f64,
}

/// Complete imaging analysis record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResults {
    pub patient_data: PatientData,
    /// Accumulated score, clamped to 100
    pub risk_score: u32,
    pub risk_level: ImagingStage,
    /// Display confidence in [85, 95); not a statistical quantity
    pub confidence: f64,
    /// Stage name as shown in the history
    pub stage: String,
    pub recommendations: ImagingRecommendations,
    pub analysis: BoneAnalysis,
    /// Heatmap overlay as a `data:` URL
    pub heatmap: String,
}
