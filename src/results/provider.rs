//! Load-once results provider.
//!
//! The document is read a single time at startup. Failures are logged and
//! kept as state so handlers can render an empty/error view; they never
//! abort the service.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::gauge;
use serde::Serialize;
use tracing::{info, warn};

use super::schema::EvaluationResults;
use super::ResultsError;

/// Where the served document came from and when it was read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provenance {
    pub source: PathBuf,
    pub loaded_at: DateTime<Utc>,
}

impl Provenance {
    fn now(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            loaded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ResultsState {
    Loaded {
        results: Arc<EvaluationResults>,
        provenance: Provenance,
    },
    Unavailable {
        reason: String,
    },
    Invalid {
        reason: String,
    },
}

/// Error view handed to consumers when no document can be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoResults {
    /// `results_unavailable` or `invalid_results_document`.
    pub error: &'static str,
    pub detail: String,
}

#[derive(Debug, Clone)]
pub struct ResultsProvider {
    state: ResultsState,
}

/// Read and validate the document at `path`.
pub async fn load_from_path(path: &Path) -> Result<EvaluationResults, ResultsError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ResultsError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;
    EvaluationResults::from_json_str(&raw)
}

impl ResultsProvider {
    /// Perform the one-time load. Never fails; see [`ResultsState`].
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let state = match load_from_path(path).await {
            Ok(results) => {
                for w in results.consistency_warnings() {
                    warn!(target: "results", path = %path.display(), "{w}");
                }
                info!(
                    target: "results",
                    path = %path.display(),
                    folds = results.fold_results.len(),
                    classes = results.class_count(),
                    "results document loaded"
                );
                ResultsState::Loaded {
                    results: Arc::new(results),
                    provenance: Provenance::now(path),
                }
            }
            Err(e @ ResultsError::Unavailable { .. }) => {
                warn!(target: "results", error = %e, "results document unavailable");
                ResultsState::Unavailable {
                    reason: e.to_string(),
                }
            }
            Err(e @ ResultsError::Invalid(_)) => {
                warn!(target: "results", error = %e, "results document rejected");
                ResultsState::Invalid {
                    reason: e.to_string(),
                }
            }
        };
        Self::with_state(state)
    }

    /// Serve an in-memory document (tests, demos). Validates first.
    pub fn from_results(results: EvaluationResults) -> Self {
        let state = match results.validate() {
            Ok(()) => ResultsState::Loaded {
                results: Arc::new(results),
                provenance: Provenance::now("<memory>"),
            },
            Err(e) => ResultsState::Invalid {
                reason: e.to_string(),
            },
        };
        Self::with_state(state)
    }

    fn with_state(state: ResultsState) -> Self {
        let loaded = matches!(state, ResultsState::Loaded { .. });
        gauge!("dashboard_results_loaded").set(if loaded { 1.0 } else { 0.0 });
        Self { state }
    }

    pub fn state(&self) -> &ResultsState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, ResultsState::Loaded { .. })
    }

    pub fn provenance(&self) -> Option<&Provenance> {
        match &self.state {
            ResultsState::Loaded { provenance, .. } => Some(provenance),
            _ => None,
        }
    }

    pub fn results(&self) -> Result<Arc<EvaluationResults>, NoResults> {
        match &self.state {
            ResultsState::Loaded { results, .. } => Ok(results.clone()),
            ResultsState::Unavailable { reason } => Err(NoResults {
                error: "results_unavailable",
                detail: reason.clone(),
            }),
            ResultsState::Invalid { reason } => Err(NoResults {
                error: "invalid_results_document",
                detail: reason.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::sample::sample_results;

    #[tokio::test]
    async fn missing_file_degrades_to_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let p = ResultsProvider::load(dir.path().join("nope.json")).await;
        assert!(!p.is_loaded());
        assert!(p.provenance().is_none());
        assert_eq!(p.results().unwrap_err().error, "results_unavailable");
    }

    #[tokio::test]
    async fn loads_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_results.json");
        std::fs::write(&path, serde_json::to_string(&sample_results()).unwrap()).unwrap();
        let p = ResultsProvider::load(&path).await;
        assert_eq!(p.results().unwrap().as_ref(), &sample_results());
        assert_eq!(p.provenance().unwrap().source, path);
    }

    #[test]
    fn invalid_in_memory_document_is_rejected_whole() {
        let mut doc = sample_results();
        doc.confusion_matrix[0].push(1);
        let p = ResultsProvider::from_results(doc);
        let err = p.results().unwrap_err();
        assert_eq!(err.error, "invalid_results_document");
        assert!(err.detail.contains("square"), "{}", err.detail);
    }
}
