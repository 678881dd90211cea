// src/lib.rs
// Public library surface for integration tests (and the binary).

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod facets;
pub mod filter;
pub mod grouping;
pub mod ingest;
pub mod location;
pub mod metrics;
pub mod posting;
pub mod session;
pub mod sorter;
pub mod telemetry;
pub mod window;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router as router;
pub use crate::engine::{derive_feed, FeedView};
pub use crate::error::IngestError;
pub use crate::filter::{filter, FilterCriteria, ALL_COMPANIES};
pub use crate::grouping::{group_by_company, GroupedResult};
pub use crate::location::normalize;
pub use crate::posting::{enrich, JobPosting, NormalizedJobPosting, UNKNOWN_COMPANY};
pub use crate::sorter::{sort_postings, SortDirection};
pub use crate::window::{in_window, CustomRange, DatePreset};

use std::sync::Arc;

use axum::Router;
use tracing::{info, warn};

use crate::api::AppState;
use crate::config::feed::FeedConfig;
use crate::ingest::providers::HttpListingProvider;
use crate::ingest::types::ListingProvider;
use crate::metrics::Metrics;

/// Build the full in-process app the binary serves: config from disk/env,
/// HTTP listing provider, a fresh session with the initial page-load fetch
/// running in the background, and `/metrics` when enabled.
pub async fn app() -> anyhow::Result<Router> {
    let cfg = FeedConfig::load_default()?;
    let http = HttpListingProvider::from_config(&cfg)?;
    info!(target: "feed", listing_url = %http.url(), "listing provider ready");

    let provider: Arc<dyn ListingProvider> = Arc::new(http);
    let state = AppState::new(provider);

    let (session, provider) = (state.session.clone(), state.provider.clone());
    tokio::spawn(async move {
        let outcome = session.refresh(provider.as_ref()).await;
        info!(target: "feed", ?outcome, "initial fetch finished");
    });

    let mut router = api::create_router(state);
    if Metrics::enabled() {
        match Metrics::init(cfg.request_timeout_ms) {
            Ok(m) => router = router.merge(m.router()),
            Err(e) => warn!(error = ?e, "metrics disabled"),
        }
    }
    Ok(router)
}
