//! # Feed Session
//! In-memory state for one browsing session: the fetched collection, the
//! current criteria, and fetch versioning.
//!
//! Every fetch takes a new generation number. When a response arrives it is
//! applied only if no newer fetch has been started since, so a slow answer to
//! an old search can never overwrite the result of the latest one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use tracing::{debug, info};

use crate::engine::{derive_feed, FeedView};
use crate::filter::{FilterCriteria, ALL_COMPANIES};
use crate::ingest::{
    self,
    types::{FetchRequest, ListingProvider},
};
use crate::posting::NormalizedJobPosting;
use crate::sorter::SortDirection;
use crate::telemetry::anon_hash;
use crate::window::{CustomRange, DatePreset};

/// What the result area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedState {
    /// No fetch has completed yet.
    Loading,
    /// Last applied fetch failed; no postings are kept alongside the error.
    Failed(String),
    Ready(Arc<Vec<NormalizedJobPosting>>),
}

impl FeedState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Failed(_) => "failed",
            Self::Ready(_) => "ready",
        }
    }
}

/// How a fetch ended from the session's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FetchOutcome {
    Applied { generation: u64, postings: usize },
    Failed { generation: u64 },
    /// A newer fetch started before this one finished; its response was dropped.
    Superseded { generation: u64 },
}

#[derive(Debug)]
struct Inner {
    state: FeedState,
    criteria: FilterCriteria,
    settled_generation: u64,
}

#[derive(Debug)]
pub struct FeedSession {
    generation: AtomicU64,
    inner: RwLock<Inner>,
}

impl Default for FeedSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSession {
    pub fn new() -> Self {
        Self::with_criteria(FilterCriteria::default())
    }

    pub fn with_criteria(criteria: FilterCriteria) -> Self {
        Self {
            generation: AtomicU64::new(0),
            inner: RwLock::new(Inner {
                state: FeedState::Loading,
                criteria,
                settled_generation: 0,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> FeedState {
        self.read().state.clone()
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.read().criteria.clone()
    }

    /// State and criteria read under one lock, so they belong together.
    pub fn snapshot(&self) -> (FeedState, FilterCriteria) {
        let g = self.read();
        (g.state.clone(), g.criteria.clone())
    }

    /// Latest generation handed out.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// True while the latest fetch has not been applied yet.
    pub fn is_fetching(&self) -> bool {
        self.read().settled_generation != self.generation()
    }

    /// Commit event: the user submitted a search term.
    pub async fn commit_search(&self, provider: &dyn ListingProvider, text: &str) -> FetchOutcome {
        let (generation, request) = self.begin_fetch(|c| c.search_text = text.trim().to_string());
        info!(
            target: "feed",
            generation,
            search_id = %anon_hash(request.search_text.as_deref().unwrap_or_default()),
            "search committed"
        );
        self.fetch(provider, generation, request).await
    }

    /// Commit event: the user picked a company (or `"All"`). The name is kept
    /// verbatim; only a blank selection falls back to `"All"`.
    pub async fn select_company(
        &self,
        provider: &dyn ListingProvider,
        company: &str,
    ) -> FetchOutcome {
        let (generation, request) = self.begin_fetch(|c| {
            c.company = if company.trim().is_empty() {
                ALL_COMPANIES.to_string()
            } else {
                company.to_string()
            };
        });
        self.fetch(provider, generation, request).await
    }

    /// Re-fetch with the committed search text and company.
    pub async fn refresh(&self, provider: &dyn ListingProvider) -> FetchOutcome {
        let (generation, request) = self.begin_fetch(|_| {});
        self.fetch(provider, generation, request).await
    }

    /// Apply a criteria change and take the next generation under one write
    /// lock, so generation order always matches the order of committed
    /// criteria.
    fn begin_fetch(&self, update: impl FnOnce(&mut FilterCriteria)) -> (u64, FetchRequest) {
        let mut g = self.write();
        update(&mut g.criteria);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let request = FetchRequest::new(&g.criteria.search_text, &g.criteria.company);
        (generation, request)
    }

    pub fn set_countries<I, S>(&self, countries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.write().criteria.countries = countries.into_iter().map(Into::into).collect();
    }

    pub fn set_date_window(&self, preset: DatePreset, custom: CustomRange) {
        let mut g = self.write();
        g.criteria.date_preset = preset;
        g.criteria.custom_range = custom;
    }

    pub fn set_sort(&self, sort: SortDirection) {
        self.write().criteria.sort = sort;
    }

    /// Derive the feed for the current collection and criteria and hand it to
    /// `f`. `None` unless the session is `Ready`.
    pub fn with_view<R>(&self, now: DateTime<Utc>, f: impl FnOnce(&FeedView<'_>) -> R) -> Option<R> {
        let (state, criteria) = self.snapshot();
        match state {
            FeedState::Ready(postings) => Some(f(&derive_feed(&postings, &criteria, now))),
            _ => None,
        }
    }

    async fn fetch(
        &self,
        provider: &dyn ListingProvider,
        generation: u64,
        request: FetchRequest,
    ) -> FetchOutcome {
        debug!(target: "feed", generation, provider = provider.name(), "fetch started");

        let result = ingest::fetch_once(provider, &request).await;

        let mut g = self.write();
        if generation != self.generation.load(Ordering::SeqCst) {
            counter!("feed_stale_responses_total").increment(1);
            debug!(target: "feed", generation, "stale response dropped");
            return FetchOutcome::Superseded { generation };
        }
        g.settled_generation = generation;
        match result {
            Ok(postings) => {
                let count = postings.len();
                g.state = FeedState::Ready(Arc::new(postings));
                FetchOutcome::Applied {
                    generation,
                    postings: count,
                }
            }
            Err(e) => {
                g.state = FeedState::Failed(e.to_string());
                FetchOutcome::Failed { generation }
            }
        }
    }
}
