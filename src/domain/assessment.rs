//! Questionnaire input for the osteoporosis risk calculator.
//!
//! The questionnaire is filled over several form steps, so it is collected in
//! an [`AssessmentDraft`] and only turned into an [`AssessmentInput`] once every
//! required answer is present.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::MissingFields;

/// Biological sex as asked by the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Self; 2] = [Self::Female, Self::Male];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Menopause status. Only meaningful when gender is female.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenopauseStatus {
    Premenopausal,
    Perimenopausal,
    Postmenopausal,
    /// Menopause before 45
    EarlyMenopause,
}

impl MenopauseStatus {
    pub const ALL: [Self; 4] = [
        Self::Premenopausal,
        Self::Perimenopausal,
        Self::Postmenopausal,
        Self::EarlyMenopause,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Premenopausal => "Pre-menopausal",
            Self::Perimenopausal => "Peri-menopausal",
            Self::Postmenopausal => "Post-menopausal",
            Self::EarlyMenopause => "Early menopause (before 45)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmokingStatus {
    Never,
    Former,
    Current,
}

impl SmokingStatus {
    pub const ALL: [Self; 3] = [Self::Never, Self::Former, Self::Current];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Never => "Never smoked",
            Self::Former => "Former smoker",
            Self::Current => "Current smoker",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlcoholConsumption {
    None,
    Light,
    Moderate,
    Heavy,
}

impl AlcoholConsumption {
    pub const ALL: [Self; 4] = [Self::None, Self::Light, Self::Moderate, Self::Heavy];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "No alcohol",
            Self::Light => "Light (1-2 drinks/week)",
            Self::Moderate => "Moderate (3-7 drinks/week)",
            Self::Heavy => "Heavy (8+ drinks/week)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhysicalActivity {
    Sedentary,
    Light,
    Moderate,
    Active,
}

impl PhysicalActivity {
    pub const ALL: [Self; 4] = [
        Self::Sedentary,
        Self::Light,
        Self::Moderate,
        Self::Active,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sedentary => "Sedentary (little to no exercise)",
            Self::Light => "Light (1-2 days/week)",
            Self::Moderate => "Moderate (3-4 days/week)",
            Self::Active => "Active (5+ days/week)",
        }
    }
}

/// Shared scale for calcium, vitamin D and protein intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeLevel {
    Low,
    Moderate,
    Adequate,
    High,
}

impl IntakeLevel {
    pub const ALL: [Self; 4] = [Self::Low, Self::Moderate, Self::Adequate, Self::High];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::Adequate => "Adequate",
            Self::High => "High",
        }
    }

    /// Adequate or high intake counts as a protective factor.
    #[must_use]
    pub fn is_sufficient(&self) -> bool {
        matches!(self, Self::Adequate | Self::High)
    }
}

/// Chronic diseases offered by the questionnaire. Only some are scored.
pub const CHRONIC_DISEASES: [&str; 6] = [
    "Rheumatoid arthritis",
    "Diabetes",
    "Thyroid disorders",
    "Kidney disease",
    "Liver disease",
    "Gastrointestinal disorders",
];

/// Medications offered by the questionnaire. Only some are scored.
pub const MEDICATIONS: [&str; 6] = [
    "Corticosteroids",
    "Anti-seizure medications",
    "Proton pump inhibitors",
    "Blood thinners",
    "Hormone therapy",
    "Chemotherapy drugs",
];

/// A fully populated questionnaire, ready for scoring.
///
/// Lifestyle and diet answers are optional here so hand-built inputs can omit
/// them; the scoring rules treat an absent answer as "rule does not match".
/// Inputs produced by [`AssessmentDraft::build`] always carry them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentInput {
    /// Age in years
    pub age: u32,
    pub gender: Gender,
    /// Height in centimeters
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,

    pub family_history_osteoporosis: bool,
    pub family_history_fractures: bool,
    pub previous_fractures: bool,

    pub chronic_diseases: BTreeSet<String>,
    pub medications: BTreeSet<String>,
    pub menopause_status: Option<MenopauseStatus>,

    pub smoking_status: Option<SmokingStatus>,
    pub alcohol_consumption: Option<AlcoholConsumption>,
    pub physical_activity: Option<PhysicalActivity>,

    pub calcium_intake: Option<IntakeLevel>,
    #[serde(rename = "vitaminDIntake")]
    pub vitamin_d_intake: Option<IntakeLevel>,
    pub protein_intake: Option<IntakeLevel>,
}

impl AssessmentInput {
    /// Create an input with the required demographics and every other answer
    /// left at its most neutral value.
    #[must_use]
    pub fn new(age: u32, gender: Gender, height: f64, weight: f64) -> Self {
        Self {
            age,
            gender,
            height,
            weight,
            family_history_osteoporosis: false,
            family_history_fractures: false,
            previous_fractures: false,
            chronic_diseases: BTreeSet::new(),
            medications: BTreeSet::new(),
            menopause_status: None,
            smoking_status: None,
            alcohol_consumption: None,
            physical_activity: None,
            calcium_intake: None,
            vitamin_d_intake: None,
            protein_intake: None,
        }
    }

    /// Body-mass index: weight(kg) / height(m)².
    #[must_use]
    pub fn bmi(&self) -> f64 {
        body_mass_index(self.height, self.weight)
    }

    #[must_use]
    pub fn has_chronic_disease(&self, disease: &str) -> bool {
        self.chronic_diseases.contains(disease)
    }

    #[must_use]
    pub fn takes_medication(&self, medication: &str) -> bool {
        self.medications.contains(medication)
    }

    /// Check the numeric demographics the scoring rules divide by.
    ///
    /// # Errors
    /// Returns one message per field that is zero, negative or non-finite.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.age == 0 {
            errors.push("Age must be greater than 0".to_string());
        }
        if !self.height.is_finite() || self.height <= 0.0 {
            errors.push(format!("Height {} must be a positive number of centimeters", self.height));
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            errors.push(format!("Weight {} must be a positive number of kilograms", self.weight));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// BMI from centimeters and kilograms.
#[must_use]
pub fn body_mass_index(height_cm: f64, weight_kg: f64) -> f64 {
    let meters = height_cm / 100.0;
    weight_kg / (meters * meters)
}

/// Partially answered questionnaire, accumulated across form steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentDraft {
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height: Option<f64>,
    pub weight: Option<f64>,

    pub family_history_osteoporosis: bool,
    pub family_history_fractures: bool,
    pub previous_fractures: bool,
    pub chronic_diseases: BTreeSet<String>,
    pub medications: BTreeSet<String>,
    pub menopause_status: Option<MenopauseStatus>,

    pub smoking_status: Option<SmokingStatus>,
    pub alcohol_consumption: Option<AlcoholConsumption>,
    pub physical_activity: Option<PhysicalActivity>,

    pub calcium_intake: Option<IntakeLevel>,
    pub vitamin_d_intake: Option<IntakeLevel>,
    pub protein_intake: Option<IntakeLevel>,
}

impl AssessmentDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check or uncheck a chronic disease.
    pub fn set_chronic_disease(&mut self, disease: &str, checked: bool) {
        toggle(&mut self.chronic_diseases, disease, checked);
    }

    /// Check or uncheck a medication.
    pub fn set_medication(&mut self, medication: &str, checked: bool) {
        toggle(&mut self.medications, medication, checked);
    }

    /// Names of required answers that are still missing, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let required = [
            ("age", self.age.is_some()),
            ("gender", self.gender.is_some()),
            ("height", self.height.is_some()),
            ("weight", self.weight.is_some()),
            ("smokingStatus", self.smoking_status.is_some()),
            ("alcoholConsumption", self.alcohol_consumption.is_some()),
            ("physicalActivity", self.physical_activity.is_some()),
            ("calciumIntake", self.calcium_intake.is_some()),
            ("vitaminDIntake", self.vitamin_d_intake.is_some()),
            ("proteinIntake", self.protein_intake.is_some()),
        ];

        required
            .into_iter()
            .filter(|(_, present)| !present)
            .map(|(name, _)| name)
            .collect()
    }

    /// Turn the draft into a scoring input.
    ///
    /// # Errors
    /// Returns every required field that has not been answered.
    pub fn build(&self) -> Result<AssessmentInput, MissingFields> {
        let missing = self.missing_fields();
        let (Some(age), Some(gender), Some(height), Some(weight)) =
            (self.age, self.gender, self.height, self.weight)
        else {
            return Err(MissingFields::new(missing));
        };
        if !missing.is_empty() {
            return Err(MissingFields::new(missing));
        }

        Ok(AssessmentInput {
            age,
            gender,
            height,
            weight,
            family_history_osteoporosis: self.family_history_osteoporosis,
            family_history_fractures: self.family_history_fractures,
            previous_fractures: self.previous_fractures,
            chronic_diseases: self.chronic_diseases.clone(),
            medications: self.medications.clone(),
            menopause_status: self.menopause_status,
            smoking_status: self.smoking_status,
            alcohol_consumption: self.alcohol_consumption,
            physical_activity: self.physical_activity,
            calcium_intake: self.calcium_intake,
            vitamin_d_intake: self.vitamin_d_intake,
            protein_intake: self.protein_intake,
        })
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str, checked: bool) {
    if checked {
        set.insert(value.to_string());
    } else {
        set.remove(value);
    }
}
