//! Imaging-workflow risk scoring.
//!
//! The "analysis" of an uploaded X-ray is a weighted sum over the intake form:
//! no pixels are read. Only the displayed confidence carries random jitter.

use rand::Rng;

use crate::domain::{
    AnalysisResults, BoneAnalysis, Gender, ImagingRecommendations, ImagingStage, PatientData,
};

/// Score every patient starts from.
pub const BASE_SCORE: u32 = 30;

/// Scored medical-history entries: (entry, weight).
const HISTORY_WEIGHTS: [(&str, u32); 4] = [
    ("Previous fractures", 20),
    ("Family history of osteoporosis", 15),
    ("Corticosteroid use", 15),
    ("Early menopause", 20),
];

/// 1x1 transparent PNG standing in for the Grad-CAM overlay.
pub const PLACEHOLDER_HEATMAP: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8/5+hHgAHggJ/PchI7wAAAABJRU5ErkJggg==";

const LIFESTYLE: [&str; 4] = [
    "Weight-bearing exercises 3x/week",
    "Adequate calcium intake (1200mg/day)",
    "Vitamin D supplementation (1000 IU/day)",
    "Avoid smoking and excessive alcohol",
];

/// Run the imaging analysis with thread-local randomness for the confidence.
#[must_use]
pub fn compute_imaging_risk(patient: &PatientData) -> AnalysisResults {
    compute_imaging_risk_with_rng(patient, &mut rand::thread_rng())
}

/// Run the imaging analysis with a caller-supplied RNG.
///
/// Everything except `confidence` is a deterministic function of `patient`.
#[must_use]
pub fn compute_imaging_risk_with_rng<R: Rng + ?Sized>(
    patient: &PatientData,
    rng: &mut R,
) -> AnalysisResults {
    let raw_score = imaging_score(patient);
    let stage = ImagingStage::from_score(raw_score);
    let confidence = 85.0 + rng.gen_range(0.0..10.0);

    AnalysisResults {
        patient_data: patient.clone(),
        risk_score: raw_score.min(100),
        risk_level: stage,
        confidence,
        stage: stage.to_string(),
        recommendations: recommendations_for(stage),
        analysis: bone_analysis(raw_score),
        heatmap: PLACEHOLDER_HEATMAP.to_string(),
    }
}

/// Accumulated score before clamping.
#[must_use]
pub fn imaging_score(patient: &PatientData) -> u32 {
    let mut score = BASE_SCORE;

    if patient.age > 65 {
        score += 25;
    } else if patient.age > 50 {
        score += 15;
    }

    if patient.gender == Gender::Female {
        score += 10;
    }

    for (condition, weight) in HISTORY_WEIGHTS {
        if patient.has_history(condition) {
            score += weight;
        }
    }

    if patient.bmi() < 18.5 {
        score += 15;
    }

    score
}

/// Sub-scores fall linearly with the unclamped score and bottom out at fixed floors.
#[must_use]
pub fn bone_analysis(raw_score: u32) -> BoneAnalysis {
    let s = f64::from(raw_score);
    BoneAnalysis {
        bone_mineral: (50.0 - s / 2.0).max(10.0),
        trabecular: (60.0 - s / 2.5).max(15.0),
        cortical: (70.0 - s / 3.0).max(20.0),
    }
}

/// Fixed recommendation bank for a stage.
#[must_use]
pub fn recommendations_for(stage: ImagingStage) -> ImagingRecommendations {
    let medical: &[&str] = match stage {
        ImagingStage::Osteoporosis => &[
            "DEXA scan recommended",
            "Consult endocrinologist",
            "Consider bisphosphonate therapy",
        ],
        ImagingStage::Osteopenia => &[
            "DEXA scan in 1-2 years",
            "Monitor bone health",
            "Consider calcium/vitamin D supplements",
        ],
        ImagingStage::Normal => &["Routine bone health monitoring", "Maintain healthy lifestyle"],
    };

    let follow_up: &[&str] = match stage {
        ImagingStage::Osteoporosis => &["Follow-up in 3 months", "Repeat imaging in 6 months"],
        _ => &["Annual check-up", "Repeat assessment in 1-2 years"],
    };

    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    ImagingRecommendations {
        medical: owned(medical),
        lifestyle: owned(&LIFESTYLE),
        follow_up: owned(follow_up),
    }
}
