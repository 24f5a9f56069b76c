// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod features;
pub mod intensity;
pub mod metrics;
pub mod model;
pub mod predictor;
pub mod results;
pub mod scoring;
pub mod session;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;
pub use crate::features::FeatureRecord;
pub use crate::intensity::IntensityLevel;
pub use crate::predictor::{MockPredictor, Predictor};
pub use crate::results::{EvaluationResults, ResultsProvider};
pub use crate::scoring::{Prediction, ScoreBreakdown};

use std::sync::Arc;

use anyhow::Context;
use tower_http::services::ServeDir;
use tracing::info;

use crate::scoring::{ConfidenceSource, RngConfidence};

/// Build the full application from a resolved config: loads the results
/// document once, wires the mock predictor, metrics and the static UI.
pub async fn app_with_config(cfg: &AppConfig) -> anyhow::Result<axum::Router> {
    let metrics = crate::metrics::Metrics::init(cfg.predict_delay_ms)
        .context("installing prometheus recorder")?;

    let results = ResultsProvider::load(&cfg.results_path).await;

    let confidence: Box<dyn ConfidenceSource> = match cfg.rng_seed {
        Some(seed) => Box::new(RngConfidence::seeded(seed)),
        None => Box::new(RngConfidence::from_os()),
    };
    let predictor = MockPredictor::new(cfg.predict_delay(), confidence).strict(cfg.strict_features);

    info!(
        results_loaded = results.is_loaded(),
        delay_ms = cfg.predict_delay_ms,
        strict = cfg.strict_features,
        static_dir = %cfg.static_dir.display(),
        "dashboard app configured"
    );

    let state = AppState::new(results, Arc::new(predictor)).strict_features(cfg.strict_features);

    Ok(router(state)
        .merge(metrics.router())
        .fallback_service(ServeDir::new(&cfg.static_dir)))
}

/// Same as [`app_with_config`] with config resolved from file + environment.
pub async fn app() -> anyhow::Result<axum::Router> {
    let cfg = AppConfig::from_env()?;
    app_with_config(&cfg).await
}
