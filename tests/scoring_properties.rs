use std::collections::BTreeSet;

use osteoscan::domain::{
    AlcoholConsumption, AssessmentInput, Gender, ImagingStage, IntakeLevel, MenopauseStatus,
    PatientData, PhysicalActivity, RiskLevel, SmokingStatus, CHRONIC_DISEASES, MEDICAL_HISTORY,
    MEDICATIONS,
};
use osteoscan::engine::{compute_imaging_risk, compute_questionnaire_risk, imaging_score};
use proptest::prelude::*;
use proptest::sample::{select, subsequence};

fn set_of(values: Vec<&'static str>) -> BTreeSet<String> {
    values.into_iter().map(String::from).collect()
}

fn lifestyle_strategy() -> impl Strategy<
    Value = (
        Option<MenopauseStatus>,
        Option<SmokingStatus>,
        Option<AlcoholConsumption>,
        Option<PhysicalActivity>,
    ),
> {
    (
        proptest::option::of(select(MenopauseStatus::ALL.to_vec())),
        proptest::option::of(select(SmokingStatus::ALL.to_vec())),
        proptest::option::of(select(AlcoholConsumption::ALL.to_vec())),
        proptest::option::of(select(PhysicalActivity::ALL.to_vec())),
    )
}

fn intake_strategy() -> impl Strategy<Value = Option<IntakeLevel>> {
    proptest::option::of(select(IntakeLevel::ALL.to_vec()))
}

fn assessment_strategy() -> impl Strategy<Value = AssessmentInput> {
    (
        (
            0u32..120,
            select(Gender::ALL.to_vec()),
            100.0f64..220.0,
            30.0f64..150.0,
        ),
        (any::<bool>(), any::<bool>(), any::<bool>()),
        subsequence(CHRONIC_DISEASES.to_vec(), 0..=CHRONIC_DISEASES.len()),
        subsequence(MEDICATIONS.to_vec(), 0..=MEDICATIONS.len()),
        lifestyle_strategy(),
        (intake_strategy(), intake_strategy(), intake_strategy()),
    )
        .prop_map(
            |(
                (age, gender, height, weight),
                (family_osteoporosis, family_fractures, previous_fractures),
                diseases,
                medications,
                (menopause, smoking, alcohol, activity),
                (calcium, vitamin_d, protein),
            )| {
                let mut input = AssessmentInput::new(age, gender, height, weight);
                input.family_history_osteoporosis = family_osteoporosis;
                input.family_history_fractures = family_fractures;
                input.previous_fractures = previous_fractures;
                input.chronic_diseases = set_of(diseases);
                input.medications = set_of(medications);
                input.menopause_status = menopause;
                input.smoking_status = smoking;
                input.alcohol_consumption = alcohol;
                input.physical_activity = activity;
                input.calcium_intake = calcium;
                input.vitamin_d_intake = vitamin_d;
                input.protein_intake = protein;
                input
            },
        )
}

fn patient_strategy() -> impl Strategy<Value = PatientData> {
    (
        0u32..120,
        select(Gender::ALL.to_vec()),
        100.0f64..220.0,
        30.0f64..150.0,
        subsequence(MEDICAL_HISTORY.to_vec(), 0..=MEDICAL_HISTORY.len()),
    )
        .prop_map(|(age, gender, height, weight, history)| PatientData {
            patient_id: "P-PROP".into(),
            name: "Property Patient".into(),
            age,
            gender,
            height,
            weight,
            medical_history: set_of(history),
            xray: None,
        })
}

proptest! {
    #[test]
    fn questionnaire_score_is_bounded_and_banded(input in assessment_strategy()) {
        let result = compute_questionnaire_risk(&input);
        prop_assert!(result.risk_score <= 100);
        prop_assert_eq!(result.risk_level, RiskLevel::from_score(result.risk_score));
    }

    #[test]
    fn questionnaire_scoring_is_deterministic(input in assessment_strategy()) {
        prop_assert_eq!(compute_questionnaire_risk(&input), compute_questionnaire_risk(&input));
    }

    #[test]
    fn unconditional_recommendations_are_always_present(input in assessment_strategy()) {
        let recs = compute_questionnaire_risk(&input).recommendations;

        for (list, entry) in [
            (&recs.nutrition, "Follow a balanced diet rich in fruits, vegetables, and whole grains"),
            (&recs.nutrition, "Limit caffeine and excessive salt intake"),
            (&recs.exercise, "Include resistance training 2-3 times per week"),
            (&recs.exercise, "Practice balance exercises to prevent falls"),
            (&recs.medical, "Have regular check-ups to monitor bone health"),
            (&recs.medical, "Discuss your fracture risk and prevention strategies"),
            (&recs.lifestyle, "Ensure adequate sleep (7-9 hours per night)"),
            (&recs.lifestyle, "Practice stress management techniques"),
        ] {
            prop_assert!(list.iter().any(|r| r == entry), "missing {:?}", entry);
        }
    }

    #[test]
    fn risk_level_is_monotone_in_score(a in 0u32..=100, b in 0u32..=100) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(RiskLevel::from_score(low) <= RiskLevel::from_score(high));
    }

    #[test]
    fn imaging_score_clamps_raw_total(patient in patient_strategy()) {
        let raw = imaging_score(&patient);
        let results = compute_imaging_risk(&patient);

        prop_assert_eq!(results.risk_score, raw.min(100));
        prop_assert_eq!(results.risk_level, ImagingStage::from_score(raw));
        prop_assert!((85.0..95.0).contains(&results.confidence));
    }
}

#[test]
fn test_risk_level_band_boundaries() {
    assert_eq!(RiskLevel::from_score(25), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(26), RiskLevel::Moderate);
    assert_eq!(RiskLevel::from_score(50), RiskLevel::Moderate);
    assert_eq!(RiskLevel::from_score(51), RiskLevel::High);
    assert_eq!(RiskLevel::from_score(75), RiskLevel::High);
    assert_eq!(RiskLevel::from_score(76), RiskLevel::VeryHigh);
}

#[test]
fn test_imaging_scenario_previous_fracture() {
    let patient = PatientData {
        patient_id: "P-2024-001".into(),
        name: "Sample Patient".into(),
        age: 68,
        gender: Gender::Female,
        height: 160.0,
        weight: 58.0,
        medical_history: set_of(vec!["Previous fractures"]),
        xray: None,
    };

    let results = compute_imaging_risk(&patient);

    assert_eq!(results.risk_score, 85);
    assert_eq!(results.risk_level, ImagingStage::Osteoporosis);
    assert_eq!(results.stage, "Osteoporosis");
}

#[test]
fn test_young_active_adult_is_low_risk() {
    let mut input = AssessmentInput::new(25, Gender::Male, 180.0, 80.0);
    input.physical_activity = Some(PhysicalActivity::Active);
    input.calcium_intake = Some(IntakeLevel::High);
    input.vitamin_d_intake = Some(IntakeLevel::High);
    input.protein_intake = Some(IntakeLevel::High);
    input.smoking_status = Some(SmokingStatus::Never);
    input.alcohol_consumption = Some(AlcoholConsumption::None);

    let result = compute_questionnaire_risk(&input);

    assert_eq!(result.risk_score, 0);
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert!(result.risk_factors.is_empty());
    assert!(!result.protective_factors.is_empty());
}
