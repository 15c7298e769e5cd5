//! Recommendation banks for the questionnaire result.

use crate::domain::{
    AlcoholConsumption, AssessmentInput, IntakeLevel, PhysicalActivity, Recommendations,
    RiskLevel, SmokingStatus,
};

/// Build the four recommendation lists for a scored questionnaire.
///
/// Conditional entries come first in each category, followed by the
/// unconditional ones, except for exercise where the physical-therapist entry
/// is appended last for elevated levels.
#[must_use]
pub fn generate_recommendations(input: &AssessmentInput, level: RiskLevel) -> Recommendations {
    Recommendations {
        nutrition: nutrition(input),
        exercise: exercise(input, level),
        medical: medical(level),
        lifestyle: lifestyle(input),
    }
}

fn is_low_or_moderate(intake: Option<IntakeLevel>) -> bool {
    matches!(intake, Some(IntakeLevel::Low | IntakeLevel::Moderate))
}

fn nutrition(input: &AssessmentInput) -> Vec<String> {
    let mut out = Vec::new();

    if is_low_or_moderate(input.calcium_intake) {
        out.push("Increase calcium intake to 1000-1200mg daily through dairy, leafy greens, or supplements");
    }
    if is_low_or_moderate(input.vitamin_d_intake) {
        out.push("Ensure adequate vitamin D (800-1000 IU daily) through sunlight, fortified foods, or supplements");
    }
    if input.protein_intake == Some(IntakeLevel::Low) {
        out.push("Increase protein intake to 1.0-1.2g per kg body weight daily");
    }

    out.push("Follow a balanced diet rich in fruits, vegetables, and whole grains");
    out.push("Limit caffeine and excessive salt intake");

    out.into_iter().map(String::from).collect()
}

fn exercise(input: &AssessmentInput, level: RiskLevel) -> Vec<String> {
    let mut out = Vec::new();

    if matches!(
        input.physical_activity,
        Some(PhysicalActivity::Sedentary | PhysicalActivity::Light)
    ) {
        out.push("Start with 30 minutes of weight-bearing exercise 3-4 times per week");
    }

    out.push("Include resistance training 2-3 times per week");
    out.push("Practice balance exercises to prevent falls");
    out.push("Consider walking, dancing, or stair climbing as weight-bearing activities");

    if level.is_elevated() {
        out.push("Consult a physical therapist for personalized exercise program");
    }

    out.into_iter().map(String::from).collect()
}

fn medical(level: RiskLevel) -> Vec<String> {
    let mut out = Vec::new();

    if level != RiskLevel::Low {
        out.push("Schedule a bone density scan (DEXA) with your healthcare provider");
    }
    if level.is_elevated() {
        out.push("Discuss medication options with your doctor");
        out.push("Consider referral to an endocrinologist or rheumatologist");
    }

    out.push("Have regular check-ups to monitor bone health");
    out.push("Discuss your fracture risk and prevention strategies");

    out.into_iter().map(String::from).collect()
}

fn lifestyle(input: &AssessmentInput) -> Vec<String> {
    let mut out = Vec::new();

    if input.smoking_status == Some(SmokingStatus::Current) {
        out.push("Quit smoking - consider smoking cessation programs");
    }
    if matches!(
        input.alcohol_consumption,
        Some(AlcoholConsumption::Moderate | AlcoholConsumption::Heavy)
    ) {
        out.push("Limit alcohol consumption to no more than 2 drinks per day");
    }

    out.push("Ensure adequate sleep (7-9 hours per night)");
    out.push("Practice stress management techniques");
    out.push("Make your home safer to prevent falls (remove rugs, improve lighting)");

    out.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;

    const BALANCED_DIET: &str = "Follow a balanced diet rich in fruits, vegetables, and whole grains";

    #[test]
    fn test_minimal_input_gets_boilerplate_only() {
        let input = AssessmentInput::new(40, Gender::Male, 180.0, 75.0);
        let recs = generate_recommendations(&input, RiskLevel::Low);

        assert_eq!(
            recs.nutrition,
            vec![BALANCED_DIET, "Limit caffeine and excessive salt intake"]
        );
        assert_eq!(recs.exercise.len(), 3);
        assert_eq!(
            recs.medical,
            vec![
                "Have regular check-ups to monitor bone health",
                "Discuss your fracture risk and prevention strategies",
            ]
        );
        assert_eq!(recs.lifestyle.len(), 3);
        assert_eq!(recs.len(), 11);
    }

    #[test]
    fn test_conditional_entries_for_high_risk() {
        let mut input = AssessmentInput::new(70, Gender::Female, 160.0, 50.0);
        input.calcium_intake = Some(IntakeLevel::Moderate);
        input.vitamin_d_intake = Some(IntakeLevel::Low);
        input.protein_intake = Some(IntakeLevel::Low);
        input.physical_activity = Some(PhysicalActivity::Sedentary);
        input.smoking_status = Some(SmokingStatus::Current);
        input.alcohol_consumption = Some(AlcoholConsumption::Heavy);

        let recs = generate_recommendations(&input, RiskLevel::VeryHigh);

        assert_eq!(recs.nutrition.len(), 5);
        assert!(recs.nutrition[0].starts_with("Increase calcium intake"));
        assert!(recs.nutrition[1].starts_with("Ensure adequate vitamin D"));
        assert!(recs.nutrition[2].starts_with("Increase protein intake"));

        assert_eq!(
            recs.exercise.first().map(String::as_str),
            Some("Start with 30 minutes of weight-bearing exercise 3-4 times per week")
        );
        assert_eq!(
            recs.exercise.last().map(String::as_str),
            Some("Consult a physical therapist for personalized exercise program")
        );

        assert_eq!(
            recs.medical,
            vec![
                "Schedule a bone density scan (DEXA) with your healthcare provider",
                "Discuss medication options with your doctor",
                "Consider referral to an endocrinologist or rheumatologist",
                "Have regular check-ups to monitor bone health",
                "Discuss your fracture risk and prevention strategies",
            ]
        );

        assert_eq!(
            recs.lifestyle[..2],
            [
                "Quit smoking - consider smoking cessation programs",
                "Limit alcohol consumption to no more than 2 drinks per day",
            ]
        );
    }

    #[test]
    fn test_moderate_level_gets_dexa_only() {
        let input = AssessmentInput::new(55, Gender::Male, 180.0, 75.0);
        let recs = generate_recommendations(&input, RiskLevel::Moderate);

        assert_eq!(recs.medical.len(), 3);
        assert_eq!(
            recs.medical[0],
            "Schedule a bone density scan (DEXA) with your healthcare provider"
        );
        assert!(!recs
            .exercise
            .iter()
            .any(|r| r.contains("physical therapist")));
    }

    #[test]
    fn test_balanced_diet_always_present() {
        for level in [
            RiskLevel::Low,
            RiskLevel::Moderate,
            RiskLevel::High,
            RiskLevel::VeryHigh,
        ] {
            for intake in [None, Some(IntakeLevel::Low), Some(IntakeLevel::High)] {
                let mut input = AssessmentInput::new(60, Gender::Female, 160.0, 60.0);
                input.calcium_intake = intake;
                input.protein_intake = intake;
                let recs = generate_recommendations(&input, level);
                assert!(recs.nutrition.iter().any(|r| r == BALANCED_DIET));
            }
        }
    }
}
