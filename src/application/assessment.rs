//! Assessment service: Validates questionnaire answers and scores them.

use crate::domain::{AssessmentDraft, AssessmentInput, RiskResult};
use crate::engine::compute_questionnaire_risk;
use crate::OsteoscanError;

/// Runs the questionnaire risk calculator behind the input checks the engine
/// itself leaves to its caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssessmentService;

impl AssessmentService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the draft, validate it and score it.
    ///
    /// # Errors
    /// Returns `MissingFields` for unanswered required questions and
    /// `Validation` when a numeric answer is unusable.
    pub fn submit(&self, draft: &AssessmentDraft) -> Result<RiskResult, OsteoscanError> {
        let input = draft.build()?;
        self.evaluate(&input)
    }

    /// Validate a complete input and score it.
    ///
    /// # Errors
    /// Returns `Validation` if age, height or weight are not positive and finite.
    pub fn evaluate(&self, input: &AssessmentInput) -> Result<RiskResult, OsteoscanError> {
        if let Err(errors) = input.validate() {
            tracing::warn!("Rejected assessment input: {} problem(s)", errors.len());
            return Err(OsteoscanError::Validation(errors.join("; ")));
        }

        let result = compute_questionnaire_risk(input);

        tracing::info!(
            "Assessment complete: score={}, level={}, risk_factors={}, protective_factors={}",
            result.risk_score,
            result.risk_level,
            result.risk_factors.len(),
            result.protective_factors.len()
        );

        Ok(result)
    }
}
