// src/telemetry.rs
//! Tracing setup for the binary, and helpers for logging user input safely.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_LOG_JSON: &str = "JOBBOARD_LOG_JSON";
const DEFAULT_FILTER: &str = "jobboard=info,warn";

/// Install a global subscriber: compact text by default, JSON lines when
/// `JOBBOARD_LOG_JSON=1`. `RUST_LOG` overrides the filter.
///
/// Uses `try_init`, so a subscriber already installed by the hosting runtime
/// wins and this becomes a no-op.
pub fn init_tracing() {
    let json = std::env::var(ENV_LOG_JSON)
        .ok()
        .is_some_and(|v| v == "1");
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Short stable id for a piece of user text. Search terms are never logged raw.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
