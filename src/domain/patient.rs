//! Patient intake for the clinical X-ray workflow.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::assessment::{body_mass_index, Gender};
use super::upload::XrayFile;
use super::MissingFields;

/// Medical history options on the intake form.
pub const MEDICAL_HISTORY: [&str; 6] = [
    "Previous fractures",
    "Family history of osteoporosis",
    "Rheumatoid arthritis",
    "Corticosteroid use",
    "Thyroid disorders",
    "Early menopause",
];

/// Patient record submitted together with an X-ray.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientData {
    /// Clinic-assigned identifier
    pub patient_id: String,
    pub name: String,
    /// Age in years
    pub age: u32,
    pub gender: Gender,
    /// Height in centimeters
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    pub medical_history: BTreeSet<String>,
    pub xray: Option<XrayFile>,
}

impl PatientData {
    #[must_use]
    pub fn bmi(&self) -> f64 {
        body_mass_index(self.height, self.weight)
    }

    #[must_use]
    pub fn has_history(&self, condition: &str) -> bool {
        self.medical_history.contains(condition)
    }
}

/// Intake form contents while they are being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientDraft {
    pub patient_id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub height: f64,
    pub weight: f64,
    pub medical_history: BTreeSet<String>,
    pub xray: Option<XrayFile>,
}

impl Default for PatientDraft {
    fn default() -> Self {
        Self {
            patient_id: String::new(),
            name: String::new(),
            age: 0,
            gender: Gender::Female,
            height: 0.0,
            weight: 0.0,
            medical_history: BTreeSet::new(),
            xray: None,
        }
    }
}

impl PatientDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check or uncheck a medical history entry.
    pub fn set_history(&mut self, condition: &str, checked: bool) {
        if checked {
            self.medical_history.insert(condition.to_string());
        } else {
            self.medical_history.remove(condition);
        }
    }

    /// Required fields that are blank or non-positive, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let required = [
            ("patientId", !self.patient_id.trim().is_empty()),
            ("name", !self.name.trim().is_empty()),
            ("age", self.age > 0),
            ("height", positive(self.height)),
            ("weight", positive(self.weight)),
            ("xrayFile", self.xray.is_some()),
        ];

        required
            .into_iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| name)
            .collect()
    }

    /// Whether the form can be submitted for analysis.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Produce the patient record for analysis.
    ///
    /// # Errors
    /// Returns every required field that is missing.
    pub fn build(&self) -> Result<PatientData, MissingFields> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(MissingFields::new(missing));
        }

        Ok(PatientData {
            patient_id: self.patient_id.trim().to_string(),
            name: self.name.trim().to_string(),
            age: self.age,
            gender: self.gender,
            height: self.height,
            weight: self.weight,
            medical_history: self.medical_history.clone(),
            xray: self.xray.clone(),
        })
    }
}
