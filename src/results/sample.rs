//! Built-in results document with the published notebook numbers
//! (5-fold stratified CV, 3,000 samples, 4 intensity levels).
//!
//! Served by `/api/results/export` as the template for exporting real
//! results, and used by tests.

use super::schema::{
    ClassMetrics, ClassShare, EvaluationResults, FeatureCorrelation, FoldResult, OverallMetrics,
};
use crate::intensity::IntensityLevel;

const FOLDS: [(u32, f64, f64); 5] = [
    (1, 0.7796, 80.83),
    (2, 0.8013, 82.67),
    (3, 0.7590, 80.50),
    (4, 0.7491, 82.83),
    (5, 0.7073, 82.00),
];

const CORRELATIONS: [(&str, f64, &str); 8] = [
    ("signal_energy_mean_year", 0.89, "Seismic"),
    ("signal_energy_std_year", 0.87, "Seismic"),
    ("dominant_frequency_mean_year", 0.85, "Seismic"),
    ("axial_stress", 0.83, "Mechanical"),
    ("radial_stress", 0.81, "Mechanical"),
    ("elastic_strain_energy", 0.79, "Mechanical"),
    ("brittleness_ratio", 0.77, "Mechanical"),
    ("density", 0.75, "Mechanical"),
];

const DISTRIBUTION: [(u64, f64); 4] = [(758, 25.3), (766, 25.5), (729, 24.3), (747, 24.9)];

const PER_CLASS: [(f64, f64, f64, u64); 4] = [
    (94.9, 92.5, 93.7, 200),
    (88.6, 89.0, 88.8, 200),
    (87.5, 87.5, 87.5, 200),
    (93.5, 94.0, 93.7, 200),
];

pub fn sample_results() -> EvaluationResults {
    EvaluationResults {
        fold_results: FOLDS
            .iter()
            .map(|&(fold, loss, accuracy)| FoldResult {
                fold,
                loss,
                accuracy,
            })
            .collect(),
        feature_correlations: CORRELATIONS
            .iter()
            .map(|&(name, correlation, group)| FeatureCorrelation {
                name: name.to_string(),
                correlation,
                group: group.to_string(),
            })
            .collect(),
        class_distribution: IntensityLevel::ALL
            .iter()
            .zip(DISTRIBUTION)
            .map(|(level, (value, percentage))| ClassShare {
                name: format!("Level {} ({})", level.index(), level.name()),
                value,
                percentage,
                color: level.color().to_string(),
            })
            .collect(),
        confusion_matrix: vec![
            vec![185, 12, 3, 0],
            vec![8, 178, 14, 0],
            vec![2, 10, 175, 13],
            vec![0, 1, 8, 188],
        ],
        per_class_metrics: IntensityLevel::ALL
            .iter()
            .zip(PER_CLASS)
            .map(|(level, (precision, recall, f1, support))| ClassMetrics {
                class: format!("Level {}", level.index()),
                precision,
                recall,
                f1,
                support,
            })
            .collect(),
        overall_metrics: OverallMetrics {
            accuracy: 81.77,
            loss: 0.7593,
            std_accuracy: 0.95,
            std_loss: 0.0316,
        },
    }
}
