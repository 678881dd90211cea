// src/ingest/providers/fixture.rs
use async_trait::async_trait;

use crate::error::Result;
use crate::ingest::types::{FetchRequest, ListingProvider};
use crate::ingest::{decode_postings, record_skipped};
use crate::posting::JobPosting;

/// Serves a stored listing response and applies the request parameters the
/// way the listing service does: case-insensitive substring search on title
/// and company name, exact match on the raw company name.
pub struct FixtureProvider {
    body: String,
}

impl FixtureProvider {
    pub fn from_fixture(body: &str) -> Self {
        Self {
            body: body.to_string(),
        }
    }

    fn matches(p: &JobPosting, request: &FetchRequest) -> bool {
        if let Some(company) = request.company.as_deref() {
            if p.company_name.as_deref() != Some(company) {
                return false;
            }
        }
        match request.search_text.as_deref() {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                [p.title.as_deref(), p.company_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&term))
            }
        }
    }
}

#[async_trait]
impl ListingProvider for FixtureProvider {
    async fn fetch_postings(&self, request: &FetchRequest) -> Result<Vec<JobPosting>> {
        let (postings, skipped) = decode_postings(&self.body)?;
        record_skipped(self.name(), skipped);
        Ok(postings
            .into_iter()
            .filter(|p| Self::matches(p, request))
            .collect())
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
