// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::error::{IngestError, Result};
use crate::ingest::types::{FetchRequest, ListingProvider};
use crate::posting::{enrich, JobPosting, NormalizedJobPosting};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;
use serde_json::Value;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_fetch_total", "Fetches issued to the listing service.");
        describe_counter!(
            "feed_fetch_errors_total",
            "Fetches that ended in a fetch or parse failure."
        );
        describe_counter!("feed_postings_total", "Postings decoded from responses.");
        describe_counter!(
            "feed_postings_skipped_total",
            "Array entries that were not posting objects."
        );
        describe_counter!(
            "feed_stale_responses_total",
            "Responses dropped because a newer fetch superseded them."
        );
        describe_histogram!("feed_fetch_ms", "Listing fetch + decode time in milliseconds.");
        describe_gauge!("feed_last_fetch_ts", "Unix ts of the last successful fetch.");
    });
}

/// Decode a listing response body. The body must be a JSON array; entries
/// that are not objects are skipped and counted, never fatal. Records are
/// kept exactly as received: company names go back to the listing service
/// as request parameters and must match byte for byte.
/// Returns (postings, skipped_count).
pub fn decode_postings(body: &str) -> Result<(Vec<JobPosting>, usize)> {
    let root: Value = serde_json::from_str(body)?;
    let items = match root {
        Value::Array(items) => items,
        Value::Object(map) if map.contains_key("error") => {
            let msg = map
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("listing service reported an error");
            return Err(IngestError::parse(msg));
        }
        other => {
            return Err(IngestError::parse(format!(
                "expected a JSON array of postings, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut skipped = 0usize;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if item.is_object() {
            out.push(JobPosting::from(item));
        } else {
            skipped += 1;
        }
    }
    Ok((out, skipped))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Run one fetch through `provider` and enrich the result.
/// The returned collection fully replaces whatever the caller held before.
pub async fn fetch_once(
    provider: &dyn ListingProvider,
    request: &FetchRequest,
) -> Result<Vec<NormalizedJobPosting>> {
    ensure_metrics_described();
    counter!("feed_fetch_total").increment(1);

    let t0 = std::time::Instant::now();
    let fetched = provider.fetch_postings(request).await;
    histogram!("feed_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

    match fetched {
        Ok(raw) => {
            counter!("feed_postings_total").increment(raw.len() as u64);
            gauge!("feed_last_fetch_ts").set(chrono::Utc::now().timestamp().max(0) as f64);
            tracing::info!(
                target: "ingest",
                provider = provider.name(),
                postings = raw.len(),
                "listing fetched"
            );
            Ok(enrich(raw))
        }
        Err(e) => {
            tracing::warn!(
                target: "ingest",
                error = %e,
                kind = e.kind(),
                provider = provider.name(),
                "listing fetch failed"
            );
            counter!("feed_fetch_errors_total", "kind" => e.kind()).increment(1);
            Err(e)
        }
    }
}

/// Record entries skipped while decoding a response.
pub(crate) fn record_skipped(provider: &'static str, skipped: usize) {
    if skipped == 0 {
        return;
    }
    ensure_metrics_described();
    counter!("feed_postings_skipped_total").increment(skipped as u64);
    tracing::warn!(target: "ingest", provider, skipped, "non-object entries skipped");
}
