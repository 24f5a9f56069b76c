//! Rockburst Dashboard Service — Binary Entrypoint
//! Boots the Axum HTTP server: results document, predictor, metrics and UI.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the tracing subscriber. `LOG_FORMAT=json` switches to JSON lines.
/// A subscriber installed by the runtime takes precedence; ours is then skipped.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rockburst_dashboard=info,tower_http=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let router = rockburst_dashboard::app().await?;
    Ok(router.into())
}
