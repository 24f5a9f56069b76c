//! Shape checks for [`EvaluationResults`].
//!
//! Hard problems (wrong matrix shape, wrong class count, non-finite metrics,
//! empty folds) are collected and reported together as a single
//! [`ResultsError::Invalid`]. Soft inconsistencies such as matrix row sums
//! that differ from the reported support are only warnings.

use std::collections::BTreeSet;

use super::schema::EvaluationResults;
use super::ResultsError;
use crate::intensity::IntensityLevel;

impl EvaluationResults {
    pub fn validate(&self) -> Result<(), ResultsError> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ResultsError::Invalid(problems.join("; ")))
        }
    }

    fn problems(&self) -> Vec<String> {
        let n = IntensityLevel::COUNT;
        let mut out = Vec::new();

        // Confusion matrix: N x N with N = number of intensity levels.
        let rows = self.confusion_matrix.len();
        if rows != n {
            out.push(format!("confusion_matrix has {rows} rows, expected {n}"));
        }
        for (i, row) in self.confusion_matrix.iter().enumerate() {
            if row.len() != rows {
                out.push(format!(
                    "confusion_matrix row {i} has {} columns, expected {rows} \
                     (matrix must be square)",
                    row.len()
                ));
            }
        }

        if matrix_total(&self.confusion_matrix).is_none() {
            out.push("confusion_matrix counts overflow".to_string());
        }

        if self.class_distribution.len() != n {
            out.push(format!(
                "class_distribution has {} classes, expected {n}",
                self.class_distribution.len()
            ));
        }
        if self.per_class_metrics.len() != n {
            out.push(format!(
                "per_class_metrics has {} classes, expected {n}",
                self.per_class_metrics.len()
            ));
        }

        if self.fold_results.is_empty() {
            out.push("fold_results is empty".to_string());
        }
        let mut seen = BTreeSet::new();
        for f in &self.fold_results {
            if !seen.insert(f.fold) {
                out.push(format!("fold {} appears more than once", f.fold));
            }
            if !f.loss.is_finite() || !f.accuracy.is_finite() {
                out.push(format!("fold {} has non-finite metrics", f.fold));
            }
        }

        for c in &self.feature_correlations {
            if !(-1.0..=1.0).contains(&c.correlation) {
                out.push(format!(
                    "correlation of '{}' is {} (outside [-1, 1])",
                    c.name, c.correlation
                ));
            }
        }

        for m in &self.per_class_metrics {
            if ![m.precision, m.recall, m.f1].iter().all(|v| v.is_finite()) {
                out.push(format!("per_class_metrics for '{}' are not finite", m.class));
            }
        }

        let o = &self.overall_metrics;
        if ![o.accuracy, o.loss, o.std_accuracy, o.std_loss]
            .iter()
            .all(|v| v.is_finite())
        {
            out.push("overall_metrics contain non-finite values".to_string());
        }

        out
    }

    /// Soft inconsistencies worth logging; never cause rejection.
    pub fn consistency_warnings(&self) -> Vec<String> {
        self.confusion_matrix
            .iter()
            .zip(&self.per_class_metrics)
            .enumerate()
            .filter_map(|(i, (row, m))| {
                let sum = checked_sum(row.iter().copied())?;
                (sum != m.support).then(|| {
                    format!(
                        "confusion_matrix row {i} sums to {sum} but '{}' reports support {}",
                        m.class, m.support
                    )
                })
            })
            .collect()
    }
}

fn checked_sum(counts: impl IntoIterator<Item = u64>) -> Option<u64> {
    counts.into_iter().try_fold(0u64, u64::checked_add)
}

/// Grand total of the matrix, `None` on overflow. Row and column sums are
/// bounded by it, so a `Some` here makes every partial sum safe.
fn matrix_total(matrix: &[Vec<u64>]) -> Option<u64> {
    checked_sum(matrix.iter().flatten().copied())
}

#[cfg(test)]
mod tests {
    use crate::results::sample::sample_results;
    use crate::results::ResultsError;

    #[test]
    fn sample_document_is_valid() {
        assert!(sample_results().validate().is_ok());
    }

    #[test]
    fn non_square_matrix_is_one_error() {
        let mut doc = sample_results();
        doc.confusion_matrix[1].pop();
        doc.confusion_matrix[2].pop();
        let msg = match doc.validate() {
            Err(ResultsError::Invalid(msg)) => msg,
            other => panic!("expected Invalid, got {other:?}"),
        };
        assert!(msg.contains("row 1"), "{msg}");
        assert!(msg.contains("row 2"), "{msg}");
    }

    #[test]
    fn matrix_side_must_match_level_count() {
        let mut doc = sample_results();
        doc.confusion_matrix.pop();
        for row in doc.confusion_matrix.iter_mut() {
            row.pop();
        }
        let msg = doc.validate().unwrap_err().to_string();
        assert!(msg.starts_with("invalid results document"), "{msg}");
        assert!(msg.contains("3 rows, expected 4"), "{msg}");
    }

    #[test]
    fn overflowing_counts_are_invalid() {
        let mut doc = sample_results();
        doc.confusion_matrix[0] = vec![u64::MAX, 1, 0, 0];
        let msg = doc.validate().unwrap_err().to_string();
        assert!(msg.contains("confusion_matrix counts overflow"), "{msg}");
        // The overflowing row is skipped; only the published level-3 mismatch remains.
        assert_eq!(doc.consistency_warnings().len(), 1);
    }

    #[test]
    fn row_sum_mismatch_is_only_a_warning() {
        let doc = sample_results();
        let warnings = doc.consistency_warnings();
        // Level 3 row sums to 197 against a support of 200 in the published numbers.
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].contains("row 3 sums to 197"));
    }
}
