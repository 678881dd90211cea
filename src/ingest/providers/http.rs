// src/ingest/providers/http.rs
use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::config::feed::FeedConfig;
use crate::error::{IngestError, Result};
use crate::ingest::types::{FetchRequest, ListingProvider};
use crate::ingest::{decode_postings, record_skipped};
use crate::posting::JobPosting;

/// Listing service over HTTP: `GET <url>?search=..&company=..` returning a
/// JSON array of postings.
pub struct HttpListingProvider {
    url: String,
    client: reqwest::Client,
}

impl HttpListingProvider {
    pub fn from_config(cfg: &FeedConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .context("building listing http client")?;
        Ok(Self {
            url: cfg.listing_url.clone(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ListingProvider for HttpListingProvider {
    async fn fetch_postings(&self, request: &FetchRequest) -> Result<Vec<JobPosting>> {
        let resp = self
            .client
            .get(&self.url)
            .query(&request.query_pairs())
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(IngestError::status(status.as_u16(), error_message(&body)));
        }

        let (postings, skipped) = decode_postings(&body)?;
        record_skipped(self.name(), skipped);
        Ok(postings)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// The listing backend reports failures as `{"error": "..."}`; fall back to
/// a clipped body for anything else.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}
