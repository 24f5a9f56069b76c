//! Figures the metrics panel derives from a validated document.

use std::collections::BTreeMap;

use serde::Serialize;

use super::schema::{ClassMetrics, EvaluationResults, FoldResult, OverallMetrics};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoldStats {
    pub count: usize,
    pub mean_accuracy: f64,
    /// Population standard deviation, as the notebook reports it.
    pub std_accuracy: f64,
    pub mean_loss: f64,
    pub std_loss: f64,
    pub best_fold: u32,
    pub worst_fold: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Averages {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Per-class figures recomputed from the confusion matrix (percent).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixClass {
    pub class: usize,
    pub actual: u64,
    pub predicted: u64,
    pub correct: u64,
    pub recall: f64,
    pub precision: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsSummary {
    pub overall: OverallMetrics,
    pub folds: FoldStats,
    pub macro_avg: Averages,
    pub weighted_avg: Averages,
    pub matrix_total: u64,
    /// Trace over total, percent.
    pub matrix_accuracy: f64,
    pub matrix_classes: Vec<MatrixClass>,
    pub features_by_group: BTreeMap<String, usize>,
    pub warnings: Vec<String>,
}

fn mean_std(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let n = values.clone().count();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = values.clone().sum::<f64>() / n as f64;
    let var = values.map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    (mean, var.sqrt())
}

fn percent(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 * 100.0 / den as f64
    }
}

fn fold_stats(folds: &[FoldResult]) -> FoldStats {
    let (mean_accuracy, std_accuracy) = mean_std(folds.iter().map(|f| f.accuracy));
    let (mean_loss, std_loss) = mean_std(folds.iter().map(|f| f.loss));
    let by_acc = |a: &&FoldResult, b: &&FoldResult| a.accuracy.total_cmp(&b.accuracy);
    FoldStats {
        count: folds.len(),
        mean_accuracy,
        std_accuracy,
        mean_loss,
        std_loss,
        best_fold: folds.iter().max_by(by_acc).map(|f| f.fold).unwrap_or_default(),
        worst_fold: folds.iter().min_by(by_acc).map(|f| f.fold).unwrap_or_default(),
    }
}

fn macro_avg(metrics: &[ClassMetrics]) -> Averages {
    let n = metrics.len().max(1) as f64;
    Averages {
        precision: metrics.iter().map(|m| m.precision).sum::<f64>() / n,
        recall: metrics.iter().map(|m| m.recall).sum::<f64>() / n,
        f1: metrics.iter().map(|m| m.f1).sum::<f64>() / n,
    }
}

fn weighted_avg(metrics: &[ClassMetrics]) -> Averages {
    let total = metrics.iter().fold(0u64, |acc, m| acc.saturating_add(m.support));
    if total == 0 {
        return macro_avg(metrics);
    }
    let w = |f: fn(&ClassMetrics) -> f64| {
        metrics
            .iter()
            .map(|m| f(m) * m.support as f64)
            .sum::<f64>()
            / total as f64
    };
    Averages {
        precision: w(|m| m.precision),
        recall: w(|m| m.recall),
        f1: w(|m| m.f1),
    }
}

fn matrix_classes(matrix: &[Vec<u64>]) -> Vec<MatrixClass> {
    (0..matrix.len())
        .map(|i| {
            let actual = matrix[i].iter().fold(0u64, |acc, &c| acc.saturating_add(c));
            let predicted = matrix
                .iter()
                .filter_map(|row| row.get(i))
                .fold(0u64, |acc, &c| acc.saturating_add(c));
            let correct = matrix[i].get(i).copied().unwrap_or(0);
            MatrixClass {
                class: i,
                actual,
                predicted,
                correct,
                recall: percent(correct, actual),
                precision: percent(correct, predicted),
            }
        })
        .collect()
}

impl EvaluationResults {
    pub fn summary(&self) -> ResultsSummary {
        let classes = matrix_classes(&self.confusion_matrix);
        let matrix_total = classes.iter().fold(0u64, |acc, c| acc.saturating_add(c.actual));
        let trace = classes.iter().fold(0u64, |acc, c| acc.saturating_add(c.correct));

        let mut features_by_group = BTreeMap::new();
        for c in &self.feature_correlations {
            *features_by_group.entry(c.group.clone()).or_insert(0) += 1;
        }

        ResultsSummary {
            overall: self.overall_metrics.clone(),
            folds: fold_stats(&self.fold_results),
            macro_avg: macro_avg(&self.per_class_metrics),
            weighted_avg: weighted_avg(&self.per_class_metrics),
            matrix_total,
            matrix_accuracy: percent(trace, matrix_total),
            matrix_classes: classes,
            features_by_group,
            warnings: self.consistency_warnings(),
        }
    }
}
