//! # Intensity Scoring
//! Pure, testable logic that maps a [`FeatureRecord`] to a [`Prediction`].
//! No I/O and no clock; the only non-determinism is the confidence jitter,
//! which comes from a caller-supplied [`ConfidenceSource`].
//!
//! Seismic    = 0.3*energy_mean + 0.2*energy_std + 0.2*dom_freq + 0.3*energy_ratio
//! Mechanical = 0.4*axial + 0.3*radial + 0.3*strain_energy
//! Total      = (Seismic + Mechanical) / 2
//!
//! Confidence is a placeholder for a real model's predicted probability. It is
//! drawn uniformly from the level's band and carries no calibration.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::features::FeatureRecord;
use crate::intensity::IntensityLevel;

const SEISMIC_WEIGHTS: [(&str, f64); 4] = [
    ("signal_energy_mean_year", 0.3),
    ("signal_energy_std_year", 0.2),
    ("dominant_frequency_mean_year", 0.2),
    ("energy_ratio", 0.3),
];

const MECHANICAL_WEIGHTS: [(&str, f64); 3] = [
    ("axial_stress", 0.4),
    ("radial_stress", 0.3),
    ("elastic_strain_energy", 0.3),
];

/// Upper (exclusive) total-score bound for levels 0..=2; anything above is level 3.
const LEVEL_THRESHOLDS: [(f64, IntensityLevel); 3] = [
    (0.30, IntensityLevel::Low),
    (0.50, IntensityLevel::Medium),
    (0.70, IntensityLevel::High),
];

/// Derived sub-scores. In [0,1] for in-domain inputs; never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub seismic: f64,
    pub mechanical: f64,
    pub total: f64,
}

/// One prediction. Built fresh per call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub level: IntensityLevel,
    /// Percentage in the level's band (70..100 overall).
    pub confidence: f64,
    pub scores: ScoreBreakdown,
}

fn weighted(record: &FeatureRecord, weights: &[(&str, f64)]) -> f64 {
    weights
        .iter()
        .fold(0.0, |acc, (name, w)| acc + record.get(name) * w)
}

/// Weighted sub-scores for `record`. Absent fields count as 0.
pub fn score_breakdown(record: &FeatureRecord) -> ScoreBreakdown {
    let seismic = weighted(record, &SEISMIC_WEIGHTS);
    let mechanical = weighted(record, &MECHANICAL_WEIGHTS);
    ScoreBreakdown {
        seismic,
        mechanical,
        total: (seismic + mechanical) / 2.0,
    }
}

/// Band lookup: strict `<` against ascending thresholds, first match wins.
pub fn classify(total: f64) -> IntensityLevel {
    LEVEL_THRESHOLDS
        .iter()
        .find(|(upper, _)| total < *upper)
        .map(|(_, level)| *level)
        .unwrap_or(IntensityLevel::VeryHigh)
}

/// Source of uniform draws in `[0, 1)` for the confidence jitter.
pub trait ConfidenceSource: Send {
    fn unit(&mut self) -> f64;
}

/// Production source backed by any `rand` generator.
#[derive(Debug)]
pub struct RngConfidence<R = StdRng> {
    rng: R,
}

impl<R: RngCore + Send> RngConfidence<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngConfidence<StdRng> {
    /// Reproducible draws, used when `rng_seed` is configured.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_os() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: RngCore + Send> ConfidenceSource for RngConfidence<R> {
    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Always returns the same fraction of the band. Values are clamped into [0,1).
#[derive(Debug, Clone, Copy)]
pub struct FixedConfidence(pub f64);

impl ConfidenceSource for FixedConfidence {
    fn unit(&mut self) -> f64 {
        self.0
    }
}

/// Map a unit draw into the level's half-open band.
pub fn confidence_for(level: IntensityLevel, unit: f64) -> f64 {
    let band = level.confidence_band();
    let u = if unit.is_finite() {
        unit.clamp(0.0, 1.0 - f64::EPSILON)
    } else {
        0.0
    };
    let c = band.start + u * (band.end - band.start);
    // keep the half-open upper bound even after rounding (band ends are positive)
    if c >= band.end {
        f64::from_bits(band.end.to_bits() - 1)
    } else {
        c
    }
}

/// Score, classify and attach a confidence draw. Does not touch `record`.
pub fn predict(record: &FeatureRecord, confidence: &mut dyn ConfidenceSource) -> Prediction {
    let scores = score_breakdown(record);
    let level = classify(scores.total);
    Prediction {
        level,
        confidence: confidence_for(level, confidence.unit()),
        scores,
    }
}
