// src/ingest/types.rs
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::ALL_COMPANIES;
use crate::posting::JobPosting;

/// Parameters sent to the listing service on a commit event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FetchRequest {
    pub search_text: Option<String>, // matched server-side on title + company
    pub company: Option<String>,     // None = all companies
}

impl FetchRequest {
    /// Build from committed UI values; blank search and the `"All"` sentinel
    /// are dropped so they never reach the wire. A company name is sent as-is
    /// since the listing service matches it exactly.
    pub fn new(search_text: &str, company: &str) -> Self {
        let search = search_text.trim();
        Self {
            search_text: (!search.is_empty()).then(|| search.to_string()),
            company: (!company.trim().is_empty() && company != ALL_COMPANIES)
                .then(|| company.to_string()),
        }
    }

    /// Query-string pairs in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::with_capacity(2);
        if let Some(s) = self.search_text.as_deref() {
            out.push(("search", s));
        }
        if let Some(c) = self.company.as_deref() {
            out.push(("company", c));
        }
        out
    }
}

#[async_trait::async_trait]
pub trait ListingProvider: Send + Sync {
    async fn fetch_postings(&self, request: &FetchRequest) -> Result<Vec<JobPosting>>;
    fn name(&self) -> &'static str;
}
