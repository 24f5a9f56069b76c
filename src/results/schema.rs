//! Wire schema of the pre-computed evaluation results document.
//!
//! Every top-level key is required; a missing key fails deserialization and
//! the whole document is rejected. Unknown keys are ignored.

use serde::{Deserialize, Serialize};

use super::ResultsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResults {
    pub fold_results: Vec<FoldResult>,
    pub feature_correlations: Vec<FeatureCorrelation>,
    pub class_distribution: Vec<ClassShare>,
    /// Rows are actual classes, columns predicted classes.
    pub confusion_matrix: Vec<Vec<u64>>,
    pub per_class_metrics: Vec<ClassMetrics>,
    pub overall_metrics: OverallMetrics,
}

/// One cross-validation fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldResult {
    pub fold: u32,
    pub loss: f64,
    /// Percent.
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCorrelation {
    pub name: String,
    pub correlation: f64,
    /// Free-form group tag, e.g. "Seismic".
    pub group: String,
}

/// Sample count of one intensity class in the training data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassShare {
    pub name: String,
    pub value: u64,
    pub percentage: f64,
    pub color: String,
}

/// Precision/recall/F1 in percent, support as a sample count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub class: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallMetrics {
    pub accuracy: f64,
    pub loss: f64,
    pub std_accuracy: f64,
    pub std_loss: f64,
}

impl EvaluationResults {
    /// Parse and validate in one step; either a full document or one error.
    pub fn from_json_str(s: &str) -> Result<Self, ResultsError> {
        let doc: EvaluationResults =
            serde_json::from_str(s).map_err(|e| ResultsError::Invalid(e.to_string()))?;
        doc.validate()?;
        Ok(doc)
    }

    /// Number of classes the matrix describes.
    pub fn class_count(&self) -> usize {
        self.confusion_matrix.len()
    }
}
