use serde::{Deserialize, Serialize};

const CRITICAL_SOIL: f64 = 80.0;
const HIGH_SOIL: f64 = 60.0;
const HIGH_SOIL_WHEN_HUMID: f64 = 50.0;
const HIGH_HUMIDITY: f64 = 85.0;
const MEDIUM_SOIL: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            RiskLevel::Low => "#22c55e",
            RiskLevel::Medium => "#eab308",
            RiskLevel::High => "#f97316",
            RiskLevel::Critical => "#ef4444",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RiskLevel::Low => "Conditions are stable. No immediate flood risk.",
            RiskLevel::Medium => "Caution: Soil moisture rising. Moderate risk.",
            RiskLevel::High => "Warning: High soil moisture detected. Monitor closely.",
            RiskLevel::Critical => "CRITICAL: Soil saturation > 80%. High flood probability.",
        }
    }

    /// Numeric form exported as a gauge
    pub fn ordinal(self) -> i64 {
        self as i64
    }
}

/// State of the flood-risk card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// Heading text, e.g. "HIGH RISK"
    pub title: String,
    pub color: String,
    pub message: String,
    /// Glow around the card; only set for critical risk
    pub emphasized: bool,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        RiskAssessment::for_level(RiskLevel::Low)
    }
}

impl RiskAssessment {
    pub fn for_level(level: RiskLevel) -> Self {
        Self {
            level,
            title: format!("{} RISK", level.as_str()),
            color: level.color().to_string(),
            message: level.message().to_string(),
            emphasized: level == RiskLevel::Critical,
        }
    }
}

/// Classifies flood risk; the first matching rule wins.
pub fn classify(soil: f64, humidity: f64) -> RiskLevel {
    if soil > CRITICAL_SOIL {
        RiskLevel::Critical
    } else if soil > HIGH_SOIL || (soil > HIGH_SOIL_WHEN_HUMID && humidity > HIGH_HUMIDITY) {
        RiskLevel::High
    } else if soil > MEDIUM_SOIL {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn assess(soil: f64, humidity: f64) -> RiskAssessment {
    RiskAssessment::for_level(classify(soil, humidity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_boundary() {
        assert_eq!(classify(80.0, 0.0), RiskLevel::High);
        assert_eq!(classify(80.01, 0.0), RiskLevel::Critical);
        assert_eq!(classify(85.0, 99.0), RiskLevel::Critical);
    }

    #[test]
    fn test_high_boundary() {
        assert_eq!(classify(60.0, 50.0), RiskLevel::Medium);
        assert_eq!(classify(60.5, 50.0), RiskLevel::High);
    }

    #[test]
    fn test_humid_soil_boundary() {
        assert_eq!(classify(50.0, 90.0), RiskLevel::Medium);
        assert_eq!(classify(51.0, 85.0), RiskLevel::Medium);
        assert_eq!(classify(51.0, 85.5), RiskLevel::High);
    }

    #[test]
    fn test_medium_boundary() {
        assert_eq!(classify(40.0, 90.0), RiskLevel::Low);
        assert_eq!(classify(40.1, 0.0), RiskLevel::Medium);
        assert_eq!(classify(15.0, 20.0), RiskLevel::Low);
    }

    #[test]
    fn test_assessment_display_fields() {
        let critical = assess(82.0, 40.0);
        assert_eq!(critical.title, "CRITICAL RISK");
        assert_eq!(critical.color, "#ef4444");
        assert!(critical.emphasized);

        let high = assess(65.0, 40.0);
        assert_eq!(high.title, "HIGH RISK");
        assert_eq!(high.color, "#f97316");
        assert!(!high.emphasized);

        let low = RiskAssessment::default();
        assert_eq!(low.message, "Conditions are stable. No immediate flood risk.");
    }
}
