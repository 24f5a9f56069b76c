//! Intensity levels: the four ordinal rockburst risk classes and their
//! display metadata.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Ordinal risk category assigned to a sample (0 = Low … 3 = Very High).
///
/// Serialized as its numeric level so the wire format stays `{"level": 2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntensityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl IntensityLevel {
    pub const ALL: [IntensityLevel; 4] = [
        IntensityLevel::Low,
        IntensityLevel::Medium,
        IntensityLevel::High,
        IntensityLevel::VeryHigh,
    ];

    /// Number of classes; also the required side of the confusion matrix.
    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> u8 {
        match self {
            IntensityLevel::Low => 0,
            IntensityLevel::Medium => 1,
            IntensityLevel::High => 2,
            IntensityLevel::VeryHigh => 3,
        }
    }

    pub fn from_index(i: u8) -> Option<Self> {
        Self::ALL.get(i as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            IntensityLevel::Low => "Low",
            IntensityLevel::Medium => "Medium",
            IntensityLevel::High => "High",
            IntensityLevel::VeryHigh => "Very High",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            IntensityLevel::Low => "#4CAF50",
            IntensityLevel::Medium => "#FF9800",
            IntensityLevel::High => "#F44336",
            IntensityLevel::VeryHigh => "#9C27B0",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            IntensityLevel::Low => "Minimal risk, normal operations",
            IntensityLevel::Medium => "Moderate risk, increased monitoring",
            IntensityLevel::High => "High risk, safety protocols required",
            IntensityLevel::VeryHigh => "Critical risk, immediate action needed",
        }
    }

    /// Alert severity the results panel uses for this level.
    pub fn severity(self) -> Severity {
        match self {
            IntensityLevel::Low | IntensityLevel::Medium => Severity::Success,
            IntensityLevel::High => Severity::Warning,
            IntensityLevel::VeryHigh => Severity::Error,
        }
    }

    /// Half-open percentage band the placeholder confidence is drawn from.
    pub fn confidence_band(self) -> Range<f64> {
        match self {
            IntensityLevel::Low => 85.0..95.0,
            IntensityLevel::Medium => 80.0..95.0,
            IntensityLevel::High => 75.0..90.0,
            IntensityLevel::VeryHigh => 70.0..90.0,
        }
    }
}

impl std::fmt::Display for IntensityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Level {}: {}", self.index(), self.name())
    }
}

impl Serialize for IntensityLevel {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(self.index())
    }
}

impl<'de> Deserialize<'de> for IntensityLevel {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let i = u8::deserialize(d)?;
        Self::from_index(i)
            .ok_or_else(|| serde::de::Error::custom(format!("intensity level out of range: {i}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// One row of the intensity level guide.
#[derive(Debug, Clone, Serialize)]
pub struct LevelInfo {
    pub level: IntensityLevel,
    pub name: &'static str,
    pub color: &'static str,
    pub description: &'static str,
    pub severity: Severity,
    pub confidence_min: f64,
    pub confidence_max: f64,
}

impl From<IntensityLevel> for LevelInfo {
    fn from(level: IntensityLevel) -> Self {
        let band = level.confidence_band();
        Self {
            level,
            name: level.name(),
            color: level.color(),
            description: level.description(),
            severity: level.severity(),
            confidence_min: band.start,
            confidence_max: band.end,
        }
    }
}

/// The full guide, ascending by level.
pub fn level_guide() -> Vec<LevelInfo> {
    IntensityLevel::ALL.into_iter().map(LevelInfo::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_and_rejects_out_of_range() {
        for l in IntensityLevel::ALL {
            assert_eq!(IntensityLevel::from_index(l.index()), Some(l));
        }
        assert_eq!(IntensityLevel::from_index(4), None);
    }

    #[test]
    fn serializes_as_number() {
        let v = serde_json::to_value(IntensityLevel::High).unwrap();
        assert_eq!(v, serde_json::json!(2));
        assert!(serde_json::from_str::<IntensityLevel>("7").is_err());
    }

    #[test]
    fn display_matches_chip_label() {
        assert_eq!(IntensityLevel::VeryHigh.to_string(), "Level 3: Very High");
    }

    #[test]
    fn severity_groups_low_and_medium() {
        assert_eq!(IntensityLevel::Low.severity(), Severity::Success);
        assert_eq!(IntensityLevel::Medium.severity(), Severity::Success);
        assert_eq!(IntensityLevel::High.severity(), Severity::Warning);
        assert_eq!(IntensityLevel::VeryHigh.severity(), Severity::Error);
    }
}
