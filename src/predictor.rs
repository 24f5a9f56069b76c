//! Predictor backends: the deferred-completion contract callers depend on,
//! plus the mock scorer that stands in for real inference.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use parking_lot::Mutex;
use tracing::debug;

use crate::features::{FeatureError, FeatureRecord};
use crate::scoring::{self, ConfidenceSource, Prediction};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("invalid feature record: {0}")]
    InvalidInput(#[from] FeatureError),
    #[error("inference backend failed: {0}")]
    Backend(String),
}

/// Anything that can turn a feature record into a prediction, eventually.
///
/// Callers only ever await the returned future; a real model server can
/// replace [`MockPredictor`] without touching handlers or the session.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, record: &FeatureRecord) -> Result<Prediction, PredictError>;

    /// Backend name for diagnostics.
    fn backend_name(&self) -> &'static str;
}

pub type DynPredictor = Arc<dyn Predictor>;

/// Weighted-sum scorer with an artificial latency before the result appears.
pub struct MockPredictor {
    delay: Duration,
    strict: bool,
    confidence: Mutex<Box<dyn ConfidenceSource>>,
}

impl MockPredictor {
    pub fn new(delay: Duration, confidence: Box<dyn ConfidenceSource>) -> Self {
        Self {
            delay,
            strict: false,
            confidence: Mutex::new(confidence),
        }
    }

    /// Reject records that fail [`FeatureRecord::validate_strict`].
    pub fn strict(mut self, on: bool) -> Self {
        self.strict = on;
        self
    }
}

#[async_trait]
impl Predictor for MockPredictor {
    async fn predict(&self, record: &FeatureRecord) -> Result<Prediction, PredictError> {
        if self.strict {
            if let Err(e) = record.validate_strict() {
                counter!("dashboard_prediction_rejected_total").increment(1);
                return Err(e.into());
            }
        }

        if record.is_empty() {
            debug!("empty feature record, every field reads as 0");
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let prediction = {
            let mut src = self.confidence.lock();
            scoring::predict(record, src.as_mut())
        };

        counter!("dashboard_predictions_total", "level" => prediction.level.index().to_string())
            .increment(1);
        debug!(
            fields = record.len(),
            level = prediction.level.index(),
            total = prediction.scores.total,
            confidence = prediction.confidence,
            "mock prediction"
        );
        Ok(prediction)
    }

    fn backend_name(&self) -> &'static str {
        "mock-weighted-sum"
    }
}
