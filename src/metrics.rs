use anyhow::Context;
use axum::{routing::get, Router};
use metrics::gauge;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const ENV_METRICS: &str = "JOBBOARD_METRICS";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and publish the configured fetch timeout.
    /// Fails if a global recorder is already installed.
    pub fn init(request_timeout_ms: u64) -> anyhow::Result<Self> {
        // Use default buckets to avoid API differences across crate versions.
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        gauge!("feed_request_timeout_ms").set(request_timeout_ms as f64);

        Ok(Self { handle })
    }

    /// `JOBBOARD_METRICS=1` turns the `/metrics` route on.
    pub fn enabled() -> bool {
        std::env::var(ENV_METRICS).ok().as_deref() == Some("1")
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
