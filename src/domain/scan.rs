//! Scan history records.

use serde::{Deserialize, Serialize};

use super::imaging::{AnalysisResults, ImagingStage};

/// Coarse risk bucket used in scan lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanRisk {
    Low,
    Moderate,
    High,
}

impl From<ImagingStage> for ScanRisk {
    fn from(stage: ImagingStage) -> Self {
        match stage {
            ImagingStage::Osteoporosis => Self::High,
            ImagingStage::Osteopenia => Self::Moderate,
            ImagingStage::Normal => Self::Low,
        }
    }
}

impl std::fmt::Display for ScanRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Moderate => write!(f, "Moderate"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Summary row sent to the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub date: String,
    pub patient_name: String,
    pub patient_id: String,
    pub age: u32,
    pub stage: String,
    pub risk: ScanRisk,
}

/// A completed analysis kept in memory for the dashboard and history views.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredScan {
    pub entry: HistoryEntry,
    pub results: AnalysisResults,
}

impl StoredScan {
    /// Wrap finished results with a fresh id and timestamp.
    #[must_use]
    pub fn new(results: AnalysisResults) -> Self {
        let date = chrono::Local::now()
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string();
        Self::with_id(uuid_v4(), date, results)
    }

    /// Wrap results with an explicit id and date.
    #[must_use]
    pub fn with_id(id: impl Into<String>, date: impl Into<String>, results: AnalysisResults) -> Self {
        let entry = HistoryEntry {
            id: id.into(),
            date: date.into(),
            patient_name: results.patient_data.name.clone(),
            patient_id: results.patient_data.patient_id.clone(),
            age: results.patient_data.age,
            stage: results.risk_level.to_string(),
            risk: results.risk_level.into(),
        };
        Self { entry, results }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.entry.id
    }
}

/// Generate a random UUID v4 using a CSPRNG.
fn uuid_v4() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_from_stage() {
        assert_eq!(ScanRisk::from(ImagingStage::Osteoporosis), ScanRisk::High);
        assert_eq!(ScanRisk::from(ImagingStage::Osteopenia), ScanRisk::Moderate);
        assert_eq!(ScanRisk::from(ImagingStage::Normal), ScanRisk::Low);
    }

    #[test]
    fn test_history_entry_wire_format() {
        let entry = HistoryEntry {
            id: "1".into(),
            date: "1/2/2026, 3:04:05 PM".into(),
            patient_name: "Jane Doe".into(),
            patient_id: "P-001".into(),
            age: 68,
            stage: "Osteoporosis".into(),
            risk: ScanRisk::High,
        };

        let json = serde_json::to_value(&entry).expect("Should serialize");
        let keys: Vec<&str> = json
            .as_object()
            .expect("Should be an object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys.len(), 7);
        for key in ["id", "date", "patientName", "patientId", "age", "stage", "risk"] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert_eq!(json["risk"], "High");
        assert_eq!(json["age"], 68);
    }

    #[test]
    fn test_uuid_generation() {
        let id1 = uuid_v4();
        let id2 = uuid_v4();
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36);
        assert_eq!(&id1[14..15], "4");
    }
}
