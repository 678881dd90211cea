use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::engine::derive_feed;
use crate::filter::{FilterCriteria, ALL_COMPANIES};
use crate::ingest::types::ListingProvider;
use crate::session::{FeedSession, FeedState, FetchOutcome};
use crate::sorter::SortDirection;
use crate::window::DatePreset;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<FeedSession>,
    pub provider: Arc<dyn ListingProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn ListingProvider>) -> Self {
        Self {
            session: Arc::new(FeedSession::new()),
            provider,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/jobs", get(list_jobs))
        .route("/api/feed", get(get_feed))
        .route("/api/feed/search", post(commit_search))
        .route("/api/feed/company", post(select_company))
        .route("/api/feed/refresh", post(refresh))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Query overrides for `/api/feed`; anything absent keeps the session value.
#[derive(Debug, Default, serde::Deserialize)]
pub struct FeedQuery {
    company: Option<String>,
    /// Comma-separated; an empty value clears the selection.
    countries: Option<String>,
    date: Option<String>,
    start: Option<String>,
    end: Option<String>,
    sort: Option<String>,
}

impl FeedQuery {
    fn apply(self, mut c: FilterCriteria) -> FilterCriteria {
        if let Some(company) = self.company {
            c.company = if company.trim().is_empty() {
                ALL_COMPANIES.to_string()
            } else {
                company
            };
        }
        if let Some(list) = self.countries {
            c.countries = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(preset) = self.date.as_deref().and_then(DatePreset::parse) {
            c.date_preset = preset;
        }
        if self.start.is_some() || self.end.is_some() {
            c.custom_range.start = self.start.filter(|s| !s.trim().is_empty());
            c.custom_range.end = self.end.filter(|s| !s.trim().is_empty());
        }
        if let Some(sort) = self.sort.as_deref().and_then(SortDirection::parse) {
            c.sort = sort;
        }
        c
    }
}

fn not_ready(state: &FeedState) -> Response {
    match state {
        FeedState::Failed(msg) => (StatusCode::BAD_GATEWAY, Json(json!({ "error": msg }))).into_response(),
        _ => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": state.label() })),
        )
            .into_response(),
    }
}

async fn list_jobs(State(state): State<AppState>) -> Response {
    match state.session.state() {
        FeedState::Ready(postings) => {
            let raw: Vec<_> = postings.iter().map(|p| &p.posting).collect();
            Json(raw).into_response()
        }
        other => not_ready(&other),
    }
}

async fn get_feed(State(state): State<AppState>, Query(q): Query<FeedQuery>) -> Response {
    let (feed_state, criteria) = state.session.snapshot();
    let criteria = q.apply(criteria);
    match feed_state {
        FeedState::Ready(postings) => {
            let view = derive_feed(&postings, &criteria, chrono::Utc::now());
            Json(view).into_response()
        }
        other => not_ready(&other),
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchReq {
    #[serde(default)]
    search_text: String,
}

#[derive(serde::Deserialize)]
struct CompanyReq {
    company: String,
}

fn outcome_response(session: &FeedSession, outcome: FetchOutcome) -> Response {
    let body = json!({
        "outcome": outcome,
        "state": session.state().label(),
        "criteria": session.criteria(),
    });
    let status = match outcome {
        FetchOutcome::Failed { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };
    (status, Json(body)).into_response()
}

async fn commit_search(State(state): State<AppState>, Json(body): Json<SearchReq>) -> Response {
    let outcome = state
        .session
        .commit_search(state.provider.as_ref(), &body.search_text)
        .await;
    outcome_response(&state.session, outcome)
}

async fn select_company(State(state): State<AppState>, Json(body): Json<CompanyReq>) -> Response {
    let outcome = state
        .session
        .select_company(state.provider.as_ref(), &body.company)
        .await;
    outcome_response(&state.session, outcome)
}

async fn refresh(State(state): State<AppState>) -> Response {
    let outcome = state.session.refresh(state.provider.as_ref()).await;
    outcome_response(&state.session, outcome)
}
