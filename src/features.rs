//! # Feature Record
//! Fixed catalog of model input features and the record type the predictor
//! consumes.
//!
//! A [`FeatureRecord`] is a loose `name -> value` map: callers may send a
//! partial record (absent fields read as `0.0`) or extra keys (kept, ignored
//! by scoring). [`FeatureRecord::validate_strict`] is the opt-in tightening.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Semantic subgroup a feature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureGroup {
    Seismic,
    Mechanical,
    Geological,
}

/// How the dashboard form renders a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Slider,
    /// Free numeric entry (event counts, density).
    Number,
    /// 0/1 indicator, member of a one-hot group.
    OneHot,
}

/// Static description of one known feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub group: FeatureGroup,
    pub kind: InputKind,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
    /// One-hot group id (`rock_type`, `location`), if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_hot: Option<&'static str>,
}

const fn slider(
    name: &'static str,
    label: &'static str,
    group: FeatureGroup,
    min: f64,
    max: f64,
    default: f64,
) -> FeatureSpec {
    FeatureSpec {
        name,
        label,
        group,
        kind: InputKind::Slider,
        min,
        max,
        step: 0.1,
        default,
        one_hot: None,
    }
}

const fn number(
    name: &'static str,
    label: &'static str,
    group: FeatureGroup,
    min: f64,
    max: f64,
    default: f64,
) -> FeatureSpec {
    FeatureSpec {
        name,
        label,
        group,
        kind: InputKind::Number,
        min,
        max,
        step: 0.1,
        default,
        one_hot: None,
    }
}

const fn indicator(
    name: &'static str,
    label: &'static str,
    one_hot: &'static str,
    default: f64,
) -> FeatureSpec {
    FeatureSpec {
        name,
        label,
        group: FeatureGroup::Geological,
        kind: InputKind::OneHot,
        min: 0.0,
        max: 1.0,
        step: 1.0,
        default,
        one_hot: Some(one_hot),
    }
}

use FeatureGroup::{Geological, Mechanical, Seismic};

/// Every feature the dashboard knows about, in form order.
pub const FEATURE_CATALOG: &[FeatureSpec] = &[
    // Seismic
    slider("signal_energy_mean_year", "Signal Energy Mean (Year)", Seismic, 0.0, 1.0, 0.5),
    slider("signal_energy_std_year", "Signal Energy Std (Year)", Seismic, 0.0, 1.0, 0.3),
    slider(
        "dominant_frequency_mean_year",
        "Dominant Frequency Mean (Year)",
        Seismic,
        0.0,
        1.0,
        0.4,
    ),
    slider("signal_rms_mean_year", "Signal RMS Mean (Year)", Seismic, 0.0, 1.0, 0.6),
    slider("signal_rms_std_year", "Signal RMS Std (Year)", Seismic, 0.0, 1.0, 0.2),
    number("yearly_event_count", "Yearly Event Count", Seismic, 0.0, 1000.0, 150.0),
    slider("energy_ratio", "Energy Ratio", Seismic, 0.0, 1.0, 0.7),
    slider("stress_ratio", "Stress Ratio", Seismic, 0.0, 1.0, 0.8),
    slider("freq_dur_product", "Frequency-Duration Product", Seismic, 0.0, 1.0, 0.5),
    slider("energy_per_pulse", "Energy per Pulse", Seismic, 0.0, 1.0, 0.6),
    slider("seismic_energy_density", "Seismic Energy Density", Seismic, 0.0, 1.0, 0.4),
    // Mechanical
    slider("axial_stress", "Axial Stress", Mechanical, 0.0, 1.0, 0.8),
    slider("radial_stress", "Radial Stress", Mechanical, 0.0, 1.0, 0.6),
    slider("elastic_strain_energy", "Elastic Strain Energy", Mechanical, 0.0, 1.0, 0.7),
    slider("brittleness_ratio", "Brittleness Ratio", Mechanical, 0.0, 1.0, 0.5),
    number("density", "Density (g/cm3)", Mechanical, 1.0, 5.0, 2.7),
    // Geological
    slider("hour_sin", "Hour (Sine)", Geological, -1.0, 1.0, 0.5),
    slider("hour_cos", "Hour (Cosine)", Geological, -1.0, 1.0, 0.5),
    slider("month_sin", "Month (Sine)", Geological, -1.0, 1.0, 0.5),
    slider("month_cos", "Month (Cosine)", Geological, -1.0, 1.0, 0.5),
    indicator("rock_type_granite", "Rock Type: Granite", "rock_type", 0.0),
    indicator("rock_type_limestone", "Rock Type: Limestone", "rock_type", 0.0),
    indicator("rock_type_sandstone", "Rock Type: Sandstone", "rock_type", 1.0),
    indicator("location_mine_a", "Location: Mine A", "location", 1.0),
    indicator("location_mine_b", "Location: Mine B", "location", 0.0),
    indicator("location_mine_c", "Location: Mine C", "location", 0.0),
];

/// Fields read by the scoring function. Strict mode requires all of them.
pub const SCORING_FIELDS: &[&str] = &[
    "signal_energy_mean_year",
    "signal_energy_std_year",
    "dominant_frequency_mean_year",
    "energy_ratio",
    "axial_stress",
    "radial_stress",
    "elastic_strain_energy",
];

/// Look up a feature by name.
pub fn spec(name: &str) -> Option<&'static FeatureSpec> {
    FEATURE_CATALOG.iter().find(|f| f.name == name)
}

/// Reasons a record fails strict validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureError {
    #[error("unknown feature '{0}'")]
    Unknown(String),
    #[error("missing required feature '{0}'")]
    Missing(&'static str),
    #[error("feature '{name}' is not a finite number")]
    NonFinite { name: String },
    #[error("one-hot group '{group}' has {active} active indicators (at most 1 allowed)")]
    OneHotConflict { group: &'static str, active: usize },
}

/// Feature values keyed by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRecord {
    values: BTreeMap<String, f64>,
}

impl FeatureRecord {
    /// Empty record; every field reads as 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Record filled with the form defaults.
    pub fn with_defaults() -> Self {
        Self {
            values: FEATURE_CATALOG
                .iter()
                .map(|f| (f.name.to_string(), f.default))
                .collect(),
        }
    }

    /// Value of `name`, or `0.0` when absent.
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Set any key, known or not.
    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Validate-and-reject check used when `strict_features` is on.
    ///
    /// Rejects unknown keys, non-finite values, missing scoring fields and
    /// one-hot groups with more than one active indicator. Domains are not
    /// enforced; out-of-range values simply produce unclamped scores.
    pub fn validate_strict(&self) -> Result<(), FeatureError> {
        for (name, value) in self.iter() {
            if spec(name).is_none() {
                return Err(FeatureError::Unknown(name.to_string()));
            }
            if !value.is_finite() {
                return Err(FeatureError::NonFinite {
                    name: name.to_string(),
                });
            }
        }

        if let Some(missing) = SCORING_FIELDS.iter().find(|f| !self.contains(f)) {
            return Err(FeatureError::Missing(*missing));
        }

        for group in ["rock_type", "location"] {
            let active = FEATURE_CATALOG
                .iter()
                .filter(|f| f.one_hot == Some(group))
                .filter(|f| self.get(f.name) != 0.0)
                .count();
            if active > 1 {
                return Err(FeatureError::OneHotConflict { group, active });
            }
        }
        Ok(())
    }
}
