//! # Predictor Session
//! Explicit state of the predictor panel: form values, the in-flight ticket,
//! and the last prediction. Only [`PredictorSession::set_field`],
//! [`PredictorSession::begin_predict`] / [`PredictorSession::complete`] and
//! [`PredictorSession::reset`] change it.
//!
//! Deferred completions carry the ticket issued at `begin_predict`. Only the
//! latest ticket may land; a newer predict or a reset makes older ones stale.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::features::{self, FeatureRecord};
use crate::scoring::Prediction;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("unknown feature '{0}'")]
    UnknownField(String),
    #[error("feature '{0}' must be a finite number")]
    NonFinite(String),
}

/// Monotonic id of one predict request.
pub type Ticket = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Pending,
    Ready,
}

/// What happened to a deferred completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer predict or a reset happened in between; result dropped.
    Stale,
}

#[derive(Debug, Clone)]
pub struct PredictorSession {
    form: FeatureRecord,
    prediction: Option<Prediction>,
    predicted_at: Option<DateTime<Utc>>,
    pending: Option<Ticket>,
    next_ticket: Ticket,
    last_error: Option<String>,
}

impl Default for PredictorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictorSession {
    pub fn new() -> Self {
        Self {
            form: FeatureRecord::with_defaults(),
            prediction: None,
            predicted_at: None,
            pending: None,
            next_ticket: 1,
            last_error: None,
        }
    }

    pub fn form(&self) -> &FeatureRecord {
        &self.form
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn status(&self) -> SessionStatus {
        match (self.pending, &self.prediction) {
            (Some(_), _) => SessionStatus::Pending,
            (None, Some(_)) => SessionStatus::Ready,
            (None, None) => SessionStatus::Idle,
        }
    }

    /// Update one known form field. The current prediction is kept.
    pub fn set_field(&mut self, name: &str, value: f64) -> Result<(), SessionError> {
        if features::spec(name).is_none() {
            return Err(SessionError::UnknownField(name.to_string()));
        }
        if !value.is_finite() {
            return Err(SessionError::NonFinite(name.to_string()));
        }
        self.form.set(name, value);
        Ok(())
    }

    /// Start a prediction: returns the ticket and a snapshot of the form to
    /// score. Supersedes any pending ticket.
    pub fn begin_predict(&mut self) -> (Ticket, FeatureRecord) {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(ticket);
        self.last_error = None;
        (ticket, self.form.clone())
    }

    /// Land a deferred result if `ticket` is still the latest one.
    pub fn complete(&mut self, ticket: Ticket, prediction: Prediction) -> Completion {
        if self.pending != Some(ticket) {
            return Completion::Stale;
        }
        self.pending = None;
        self.prediction = Some(prediction);
        self.predicted_at = Some(Utc::now());
        Completion::Applied
    }

    /// Record a failed prediction, if still current. The previous prediction
    /// stays displayed.
    pub fn fail(&mut self, ticket: Ticket, reason: impl Into<String>) -> Completion {
        if self.pending != Some(ticket) {
            return Completion::Stale;
        }
        self.pending = None;
        self.last_error = Some(reason.into());
        Completion::Applied
    }

    /// Restore the documented defaults and drop the prediction.
    pub fn reset(&mut self) {
        self.form = FeatureRecord::with_defaults();
        self.prediction = None;
        self.predicted_at = None;
        self.pending = None;
        self.last_error = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status(),
            pending_ticket: self.pending,
            form: self.form.clone(),
            prediction: self.prediction.clone(),
            predicted_at: self.predicted_at,
            last_error: self.last_error.clone(),
        }
    }
}

/// Wire view of the session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_ticket: Option<Ticket>,
    pub form: FeatureRecord,
    pub prediction: Option<Prediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}
