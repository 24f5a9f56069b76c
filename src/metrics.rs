use axum::{routing::get, Router};
use metrics::gauge;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

// The recorder is process-global; every router built in this process shares it.
static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (first call only) and publish the
    /// configured prediction delay.
    pub fn init(predict_delay_ms: u64) -> Result<Self, BuildError> {
        let handle = HANDLE
            .get_or_try_init(|| PrometheusBuilder::new().install_recorder())?
            .clone();

        gauge!("dashboard_predict_delay_ms").set(predict_delay_ms as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
