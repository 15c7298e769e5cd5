//! Questionnaire risk scoring.
//!
//! Each rule tests one answer (or the derived BMI) and either adds a fixed
//! weight plus a risk factor, or records a protective factor without touching
//! the score. Rules run in a fixed order and the factor lists keep that order.

use crate::domain::{
    AlcoholConsumption, AssessmentInput, Gender, IntakeLevel, MenopauseStatus, PhysicalActivity,
    RiskLevel, RiskResult, SmokingStatus,
};

use super::recommendations::generate_recommendations;

/// Upper bound of the questionnaire score.
pub const MAX_SCORE: u32 = 100;

/// Scored chronic diseases: (vocabulary entry, weight).
const CHRONIC_DISEASE_WEIGHTS: [(&str, u32); 4] = [
    ("Rheumatoid arthritis", 15),
    ("Thyroid disorders", 10),
    ("Kidney disease", 12),
    ("Gastrointestinal disorders", 10),
];

/// Scored medications: (vocabulary entry, weight, factor text).
const MEDICATION_WEIGHTS: [(&str, u32, &str); 3] = [
    ("Corticosteroids", 20, "Long-term corticosteroid use"),
    ("Proton pump inhibitors", 8, "Proton pump inhibitor use"),
    ("Anti-seizure medications", 10, "Anti-seizure medication use"),
];

/// Running total while rules are evaluated.
#[derive(Debug, Default)]
struct Tally {
    score: u32,
    risk_factors: Vec<String>,
    protective_factors: Vec<String>,
}

impl Tally {
    fn risk(&mut self, weight: u32, factor: &str) {
        self.score += weight;
        self.risk_factors.push(factor.to_string());
    }

    fn protective(&mut self, factor: &str) {
        self.protective_factors.push(factor.to_string());
    }
}

/// Score a completed questionnaire.
///
/// Precondition: `height` and `weight` are finite and positive (see
/// [`AssessmentInput::validate`]). The function does not check this itself;
/// a zero height makes the BMI infinite and simply skips the low-weight rule.
///
/// Pure and deterministic: the same input always yields the same result.
#[must_use]
pub fn compute_questionnaire_risk(input: &AssessmentInput) -> RiskResult {
    let mut tally = Tally::default();

    score_demographics(input, &mut tally);
    score_history(input, &mut tally);
    score_lifestyle(input, &mut tally);
    score_nutrition(input, &mut tally);

    let risk_score = tally.score.min(MAX_SCORE);
    let risk_level = RiskLevel::from_score(risk_score);
    let recommendations = generate_recommendations(input, risk_level);

    RiskResult {
        risk_score,
        risk_level,
        risk_factors: tally.risk_factors,
        protective_factors: tally.protective_factors,
        recommendations,
    }
}

fn score_demographics(input: &AssessmentInput, tally: &mut Tally) {
    if input.age >= 65 {
        tally.risk(25, "Age 65 or older");
    } else if input.age >= 50 {
        tally.risk(15, "Age 50 or older");
    } else if input.age < 30 {
        tally.protective("Young age");
    }

    if input.gender == Gender::Female {
        tally.risk(10, "Female gender");
    }

    if input.height > 0.0 && input.weight > 0.0 {
        let bmi = input.bmi();
        if bmi < 18.5 {
            tally.risk(15, "Low body weight (BMI < 18.5)");
        } else if bmi >= 25.0 {
            tally.protective("Healthy body weight");
        }
    }
}

fn score_history(input: &AssessmentInput, tally: &mut Tally) {
    if input.family_history_osteoporosis {
        tally.risk(15, "Family history of osteoporosis");
    }
    if input.family_history_fractures {
        tally.risk(10, "Family history of fractures");
    }
    if input.previous_fractures {
        tally.risk(20, "Previous fractures");
    }

    if input.gender == Gender::Female {
        match input.menopause_status {
            Some(MenopauseStatus::EarlyMenopause) => tally.risk(20, "Early menopause"),
            Some(MenopauseStatus::Postmenopausal) => tally.risk(10, "Post-menopausal"),
            _ => {}
        }
    }

    for (disease, weight) in CHRONIC_DISEASE_WEIGHTS {
        if input.has_chronic_disease(disease) {
            tally.risk(weight, disease);
        }
    }

    for (medication, weight, factor) in MEDICATION_WEIGHTS {
        if input.takes_medication(medication) {
            tally.risk(weight, factor);
        }
    }
}

fn score_lifestyle(input: &AssessmentInput, tally: &mut Tally) {
    // An unanswered smoking question falls through to "Non-smoker".
    match input.smoking_status {
        Some(SmokingStatus::Current) => tally.risk(15, "Current smoking"),
        Some(SmokingStatus::Former) => tally.risk(5, "Former smoking"),
        _ => tally.protective("Non-smoker"),
    }

    match input.alcohol_consumption {
        Some(AlcoholConsumption::Heavy) => tally.risk(12, "Heavy alcohol consumption"),
        Some(AlcoholConsumption::Moderate) => tally.risk(5, "Moderate alcohol consumption"),
        _ => {}
    }

    match input.physical_activity {
        Some(PhysicalActivity::Sedentary) => tally.risk(15, "Sedentary lifestyle"),
        Some(PhysicalActivity::Light) => tally.risk(8, "Low physical activity"),
        Some(PhysicalActivity::Active) => tally.protective("Regular physical activity"),
        _ => {}
    }
}

fn score_nutrition(input: &AssessmentInput, tally: &mut Tally) {
    score_intake(
        input.calcium_intake,
        tally,
        (12, "Low calcium intake"),
        "Adequate calcium intake",
    );
    score_intake(
        input.vitamin_d_intake,
        tally,
        (10, "Low vitamin D levels"),
        "Adequate vitamin D levels",
    );
    score_intake(
        input.protein_intake,
        tally,
        (8, "Low protein intake"),
        "Adequate protein intake",
    );
}

fn score_intake(
    intake: Option<IntakeLevel>,
    tally: &mut Tally,
    (weight, low_factor): (u32, &str),
    sufficient_factor: &str,
) {
    match intake {
        Some(IntakeLevel::Low) => tally.risk(weight, low_factor),
        Some(level) if level.is_sufficient() => tally.protective(sufficient_factor),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy_young_male() -> AssessmentInput {
        let mut input = AssessmentInput::new(25, Gender::Male, 180.0, 80.0);
        input.smoking_status = Some(SmokingStatus::Never);
        input.alcohol_consumption = Some(AlcoholConsumption::None);
        input.physical_activity = Some(PhysicalActivity::Active);
        input.calcium_intake = Some(IntakeLevel::High);
        input.vitamin_d_intake = Some(IntakeLevel::High);
        input.protein_intake = Some(IntakeLevel::High);
        input
    }

    #[test]
    fn test_low_risk_profile() {
        let result = compute_questionnaire_risk(&healthy_young_male());

        assert_eq!(result.risk_score, 0);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(result.risk_factors.is_empty());
        assert_eq!(
            result.protective_factors,
            vec![
                "Young age",
                "Non-smoker",
                "Regular physical activity",
                "Adequate calcium intake",
                "Adequate vitamin D levels",
                "Adequate protein intake",
            ]
        );
    }

    #[test]
    fn test_elderly_underweight_female() {
        let mut input = AssessmentInput::new(70, Gender::Female, 160.0, 45.0);
        input.smoking_status = Some(SmokingStatus::Never);
        input.alcohol_consumption = Some(AlcoholConsumption::None);
        input.physical_activity = Some(PhysicalActivity::Moderate);
        input.calcium_intake = Some(IntakeLevel::Low);
        input.vitamin_d_intake = Some(IntakeLevel::Low);
        input.protein_intake = Some(IntakeLevel::Low);

        let result = compute_questionnaire_risk(&input);

        // 25 + 10 + 15 + 12 + 10 + 8
        assert_eq!(result.risk_score, 80);
        assert_eq!(result.risk_level, RiskLevel::VeryHigh);
        assert_eq!(
            result.risk_factors,
            vec![
                "Age 65 or older",
                "Female gender",
                "Low body weight (BMI < 18.5)",
                "Low calcium intake",
                "Low vitamin D levels",
                "Low protein intake",
            ]
        );
        assert_eq!(result.protective_factors, vec!["Non-smoker"]);
    }

    #[test]
    fn test_factor_order_follows_rule_order() {
        let mut input = AssessmentInput::new(55, Gender::Female, 170.0, 80.0);
        input.family_history_osteoporosis = true;
        input.family_history_fractures = true;
        input.previous_fractures = true;
        input.menopause_status = Some(MenopauseStatus::Postmenopausal);
        input.chronic_diseases = ["Gastrointestinal disorders", "Rheumatoid arthritis", "Diabetes"]
            .into_iter()
            .map(String::from)
            .collect();
        input.medications = ["Anti-seizure medications", "Corticosteroids"]
            .into_iter()
            .map(String::from)
            .collect();
        input.smoking_status = Some(SmokingStatus::Former);
        input.alcohol_consumption = Some(AlcoholConsumption::Moderate);
        input.physical_activity = Some(PhysicalActivity::Light);

        let result = compute_questionnaire_risk(&input);

        assert_eq!(
            result.risk_factors,
            vec![
                "Age 50 or older",
                "Female gender",
                "Family history of osteoporosis",
                "Family history of fractures",
                "Previous fractures",
                "Post-menopausal",
                "Rheumatoid arthritis",
                "Gastrointestinal disorders",
                "Long-term corticosteroid use",
                "Anti-seizure medication use",
                "Former smoking",
                "Moderate alcohol consumption",
                "Low physical activity",
            ]
        );
        assert_eq!(result.protective_factors, vec!["Healthy body weight"]);
        // Far above 100 before clamping.
        assert_eq!(result.risk_score, MAX_SCORE);
        assert_eq!(result.risk_level, RiskLevel::VeryHigh);
    }

    #[test]
    fn test_menopause_ignored_for_male() {
        let mut input = healthy_young_male();
        input.menopause_status = Some(MenopauseStatus::EarlyMenopause);

        let result = compute_questionnaire_risk(&input);
        assert_eq!(result.risk_score, 0);
    }

    #[test]
    fn test_early_menopause_weight() {
        let mut input = AssessmentInput::new(40, Gender::Female, 165.0, 60.0);
        input.menopause_status = Some(MenopauseStatus::EarlyMenopause);
        input.smoking_status = Some(SmokingStatus::Never);

        let result = compute_questionnaire_risk(&input);
        assert_eq!(result.risk_score, 30);
        assert_eq!(result.risk_level, RiskLevel::Moderate);
        assert_eq!(result.risk_factors, vec!["Female gender", "Early menopause"]);
    }

    #[test]
    fn test_remaining_rule_weights() {
        let mut input = AssessmentInput::new(40, Gender::Male, 175.0, 70.0);
        input.chronic_diseases = ["Thyroid disorders", "Kidney disease"]
            .into_iter()
            .map(String::from)
            .collect();
        input.medications = ["Proton pump inhibitors".to_string()].into_iter().collect();
        input.smoking_status = Some(SmokingStatus::Current);
        input.alcohol_consumption = Some(AlcoholConsumption::Heavy);
        input.physical_activity = Some(PhysicalActivity::Sedentary);

        let result = compute_questionnaire_risk(&input);

        // 10 + 12 + 8 + 15 + 12 + 15
        assert_eq!(result.risk_score, 72);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert!(result.protective_factors.is_empty());
    }

    #[test]
    fn test_unanswered_lifestyle_rules_do_not_match() {
        let input = AssessmentInput::new(40, Gender::Male, 175.0, 70.0);
        let result = compute_questionnaire_risk(&input);

        assert_eq!(result.risk_score, 0);
        assert!(result.risk_factors.is_empty());
        assert_eq!(result.protective_factors, vec!["Non-smoker"]);
    }

    #[test]
    fn test_moderate_intake_is_neutral() {
        let mut input = AssessmentInput::new(40, Gender::Male, 175.0, 70.0);
        input.calcium_intake = Some(IntakeLevel::Moderate);
        input.vitamin_d_intake = Some(IntakeLevel::Moderate);
        input.protein_intake = Some(IntakeLevel::Moderate);

        let result = compute_questionnaire_risk(&input);
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.protective_factors, vec!["Non-smoker"]);
    }

    #[test]
    fn test_idempotent() {
        let input = healthy_young_male();
        assert_eq!(
            compute_questionnaire_risk(&input),
            compute_questionnaire_risk(&input)
        );
    }
}
