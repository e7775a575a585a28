use serde::{Deserialize, Serialize};

/// Clinically normal band used to classify a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub low: f64,
    pub high: f64,
}

/// Biologically plausible bounds. Values outside are treated as OCR or parse garbage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysiologicalLimits {
    pub min: f64,
    pub max: f64,
}

impl PhysiologicalLimits {
    /// Inclusive on both ends.
    pub fn admits(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Where a value sits relative to its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Low,
    Normal,
    High,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }

    /// `Low` iff below `range.low`, `High` iff above `range.high`, else `Normal`.
    pub fn classify(value: f64, range: &ReferenceRange) -> Self {
        if value < range.low {
            Self::Low
        } else if value > range.high {
            Self::High
        } else {
            Self::Normal
        }
    }

    pub fn is_abnormal(&self) -> bool {
        !matches!(self, Self::Normal)
    }
}

/// A validated lab result resolved against the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTest {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub status: TestStatus,
    pub ref_range: ReferenceRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: ReferenceRange = ReferenceRange { low: 12.0, high: 15.0 };

    #[test]
    fn classify_below_range_is_low() {
        assert_eq!(TestStatus::classify(10.5, &RANGE), TestStatus::Low);
    }

    #[test]
    fn classify_above_range_is_high() {
        assert_eq!(TestStatus::classify(15.01, &RANGE), TestStatus::High);
    }

    #[test]
    fn classify_bounds_are_normal() {
        assert_eq!(TestStatus::classify(12.0, &RANGE), TestStatus::Normal);
        assert_eq!(TestStatus::classify(15.0, &RANGE), TestStatus::Normal);
        assert_eq!(TestStatus::classify(13.4, &RANGE), TestStatus::Normal);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&TestStatus::High).unwrap();
        assert_eq!(json, "\"high\"");
        assert_eq!(TestStatus::Low.as_str(), "low");
    }

    #[test]
    fn only_normal_is_not_abnormal() {
        assert!(TestStatus::Low.is_abnormal());
        assert!(TestStatus::High.is_abnormal());
        assert!(!TestStatus::Normal.is_abnormal());
    }

    #[test]
    fn limits_are_inclusive() {
        let limits = PhysiologicalLimits { min: 100.0, max: 100_000.0 };
        assert!(limits.admits(100.0));
        assert!(limits.admits(100_000.0));
        assert!(!limits.admits(99.9));
        assert!(!limits.admits(999_999_999.0));
    }

    #[test]
    fn normalized_test_json_shape() {
        let test = NormalizedTest {
            name: "Hemoglobin".into(),
            value: 10.5,
            unit: "g/dL".into(),
            status: TestStatus::Low,
            ref_range: RANGE,
        };
        let json = serde_json::to_value(&test).unwrap();
        assert_eq!(json["name"], "Hemoglobin");
        assert_eq!(json["status"], "low");
        assert_eq!(json["ref_range"]["low"], 12.0);
        assert_eq!(json["ref_range"]["high"], 15.0);
    }
}
