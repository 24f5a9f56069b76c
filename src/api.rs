use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

use crate::features::{FeatureRecord, FeatureSpec, FEATURE_CATALOG, SCORING_FIELDS};
use crate::intensity::{level_guide, LevelInfo, Severity};
use crate::model::{model_info, ModelInfo};
use crate::predictor::{DynPredictor, PredictError};
use crate::results::provider::NoResults;
use crate::results::sample::sample_results;
use crate::results::{EvaluationResults, Provenance, ResultsProvider, ResultsSummary};
use crate::scoring::Prediction;
use crate::session::{
    Completion, PredictorSession, SessionError, SessionSnapshot, SessionStatus, Ticket,
};

#[derive(Clone)]
pub struct AppState {
    pub results: Arc<ResultsProvider>,
    pub predictor: DynPredictor,
    pub session: Arc<Mutex<PredictorSession>>,
    pub strict_features: bool,
}

impl AppState {
    pub fn new(results: ResultsProvider, predictor: DynPredictor) -> Self {
        Self {
            results: Arc::new(results),
            predictor,
            session: Arc::new(Mutex::new(PredictorSession::new())),
            strict_features: false,
        }
    }

    /// Only reported by `/api/features`; enforcement lives in the predictor.
    pub fn strict_features(mut self, on: bool) -> Self {
        self.strict_features = on;
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/results", get(get_results))
        .route("/api/results/summary", get(get_summary))
        .route("/api/results/export", get(get_export))
        .route("/api/levels", get(get_levels))
        .route("/api/features", get(get_features))
        .route("/api/model", get(get_model))
        .route("/api/predict", post(predict_once))
        .route("/api/session", get(get_session))
        .route("/api/session/field", post(set_field))
        .route("/api/session/predict", post(session_predict))
        .route("/api/session/reset", post(session_reset))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------- errors ----------

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    NoResults(NoResults),
    Predict(PredictError),
    Session(SessionError),
}

impl From<NoResults> for ApiError {
    fn from(e: NoResults) -> Self {
        ApiError::NoResults(e)
    }
}
impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        ApiError::Predict(e)
    }
}
impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        ApiError::Session(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            // Empty/error state for the dashboard, never a partial document.
            ApiError::NoResults(n) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody {
                    error: n.error,
                    detail: n.detail,
                },
            ),
            ApiError::Predict(e @ PredictError::InvalidInput(_)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: "invalid_feature_record",
                    detail: e.to_string(),
                },
            ),
            ApiError::Predict(e @ PredictError::Backend(_)) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    error: "prediction_failed",
                    detail: e.to_string(),
                },
            ),
            ApiError::Session(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorBody {
                    error: "invalid_field",
                    detail: e.to_string(),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

// ---------- results ----------

async fn get_results(State(state): State<AppState>) -> Result<Json<EvaluationResults>, ApiError> {
    let results = state.results.results()?;
    Ok(Json(results.as_ref().clone()))
}

#[derive(Serialize)]
struct SummaryOut {
    #[serde(flatten)]
    summary: ResultsSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<Provenance>,
}

async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryOut>, ApiError> {
    let results = state.results.results()?;
    Ok(Json(SummaryOut {
        summary: results.summary(),
        document: state.results.provenance().cloned(),
    }))
}

async fn get_export() -> Json<EvaluationResults> {
    Json(sample_results())
}

async fn get_levels() -> Json<Vec<LevelInfo>> {
    Json(level_guide())
}

async fn get_model() -> Json<ModelInfo> {
    Json(model_info())
}

#[derive(Serialize)]
struct FeaturesOut {
    features: &'static [FeatureSpec],
    scoring_fields: &'static [&'static str],
    strict: bool,
}

async fn get_features(State(state): State<AppState>) -> Json<FeaturesOut> {
    Json(FeaturesOut {
        features: FEATURE_CATALOG,
        scoring_fields: SCORING_FIELDS,
        strict: state.strict_features,
    })
}

// ---------- prediction ----------

#[derive(Serialize)]
struct PredictionOut {
    #[serde(flatten)]
    prediction: Prediction,
    name: &'static str,
    description: &'static str,
    severity: Severity,
    backend: &'static str,
}

async fn predict_once(
    State(state): State<AppState>,
    Json(record): Json<FeatureRecord>,
) -> Result<Json<PredictionOut>, ApiError> {
    let prediction = state.predictor.predict(&record).await?;
    let level = prediction.level;
    Ok(Json(PredictionOut {
        prediction,
        name: level.name(),
        description: level.description(),
        severity: level.severity(),
        backend: state.predictor.backend_name(),
    }))
}

// ---------- session ----------

async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.lock().snapshot())
}

#[derive(Deserialize)]
struct SetFieldReq {
    name: String,
    value: f64,
}

async fn set_field(
    State(state): State<AppState>,
    Json(body): Json<SetFieldReq>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let mut session = state.session.lock();
    session.set_field(&body.name, body.value)?;
    Ok(Json(session.snapshot()))
}

#[derive(Serialize)]
struct PendingOut {
    ticket: Ticket,
    status: SessionStatus,
}

async fn session_predict(State(state): State<AppState>) -> (StatusCode, Json<PendingOut>) {
    let (ticket, snapshot) = state.session.lock().begin_predict();
    debug!(ticket, "session prediction started");

    let predictor = state.predictor.clone();
    let session = state.session.clone();
    tokio::spawn(async move {
        let outcome = predictor.predict(&snapshot).await;
        let mut s = session.lock();
        let landed = match outcome {
            Ok(p) => {
                info!(ticket, level = p.level.index(), "session prediction ready");
                s.complete(ticket, p)
            }
            Err(e) => {
                warn!(ticket, error = %e, "session prediction failed");
                s.fail(ticket, e.to_string())
            }
        };
        if landed == Completion::Stale {
            counter!("dashboard_session_superseded_total").increment(1);
            debug!(ticket, "stale session prediction dropped");
        }
    });

    (
        StatusCode::ACCEPTED,
        Json(PendingOut {
            ticket,
            status: SessionStatus::Pending,
        }),
    )
}

async fn session_reset(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut session = state.session.lock();
    session.reset();
    Json(session.snapshot())
}
