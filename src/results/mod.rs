//! Evaluation results: schema, validation, derived summary, and the
//! load-once provider that feeds the dashboard.

use std::path::PathBuf;

pub mod provider;
pub mod sample;
pub mod schema;
pub mod summary;
mod validate;

pub use provider::{Provenance, ResultsProvider, ResultsState};
pub use schema::{
    ClassMetrics, ClassShare, EvaluationResults, FeatureCorrelation, FoldResult, OverallMetrics,
};
pub use summary::ResultsSummary;

/// Why a results document could not be served. All-or-nothing: there is no
/// partially loaded state.
#[derive(Debug, thiserror::Error)]
pub enum ResultsError {
    #[error("results document unavailable at {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid results document: {0}")]
    Invalid(String),
}
