//! Questionnaire risk result types.

use serde::{Deserialize, Serialize};

/// Risk level classification for the questionnaire score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Score 0-25
    Low,
    /// Score 26-50
    Moderate,
    /// Score 51-75
    High,
    /// Score 76-100
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskLevel {
    /// Map a clamped score onto its band. Upper bounds are inclusive.
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        if score <= 25 {
            Self::Low
        } else if score <= 50 {
            Self::Moderate
        } else if score <= 75 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    /// Whether the level calls for specialist follow-up.
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::High | Self::VeryHigh)
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Your risk of developing osteoporosis is low. Continue maintaining healthy habits and consider preventive measures.",
            Self::Moderate => "You have a moderate risk of developing osteoporosis. Taking preventive action now can significantly reduce your risk.",
            Self::High => "You have a high risk of developing osteoporosis. It is important to take immediate action and consult with healthcare professionals.",
            Self::VeryHigh => "You have a very high risk of developing osteoporosis. Immediate medical attention and comprehensive intervention are strongly recommended.",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Moderate => write!(f, "Moderate"),
            Self::High => write!(f, "High"),
            Self::VeryHigh => write!(f, "Very High"),
        }
    }
}

/// Personalised advice, grouped the way the results screen lists it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub nutrition: Vec<String>,
    pub exercise: Vec<String>,
    pub medical: Vec<String>,
    pub lifestyle: Vec<String>,
}

impl Recommendations {
    /// Total number of recommendations across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nutrition.len() + self.exercise.len() + self.medical.len() + self.lifestyle.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Output of the questionnaire risk calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResult {
    /// Sum of matched rule weights, clamped to 100
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    /// Matched risk factors, in rule order
    pub risk_factors: Vec<String>,
    /// Favorable conditions, in rule order
    pub protective_factors: Vec<String>,
    pub recommendations: Recommendations,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_boundaries() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(25), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(26), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(50), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(51), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(75), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(76), RiskLevel::VeryHigh);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::VeryHigh);
    }

    #[test]
    fn test_level_serializes_with_space() {
        let json = serde_json::to_string(&RiskLevel::VeryHigh).expect("Should serialize");
        assert_eq!(json, "\"Very High\"");
        assert_eq!(RiskLevel::VeryHigh.to_string(), "Very High");
    }
}
