//! JobBoard feed service: binary entrypoint.
//! Boots the Axum HTTP server via Shuttle; all wiring lives in `jobboard::app`.

use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // Picks up JOB_LISTING_URL / JOBBOARD_CONFIG_PATH / JOBBOARD_METRICS.
    let _ = dotenvy::dotenv();

    jobboard::telemetry::init_tracing();

    let router = jobboard::app().await?;
    Ok(router.into())
}
