//! # Feed Engine
//! Pure, testable derivation that maps `(postings, criteria, now)` to
//! everything the presentation layer shows. No I/O.
//!
//! Pipeline: filter -> sort -> group by company; facets come from the full
//! collection. Callers re-run it whenever an input changes and may cache the
//! result keyed on the input tuple.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::facets::{company_facet, country_facet};
use crate::filter::{filter, FilterCriteria};
use crate::grouping::{group_by_company, GroupedResult};
use crate::posting::NormalizedJobPosting;
use crate::sorter::{sort_postings, SortDirection};
use crate::window::DatePreset;

/// Derived feed for one set of inputs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedView<'a> {
    pub criteria: FilterCriteria,
    pub groups: GroupedResult<'a>,
    pub group_keys: Vec<&'a str>,
    pub companies: Vec<String>,
    pub countries: Vec<String>,
    pub summary: Vec<String>,
    /// Postings in the fetched collection.
    pub total: usize,
    /// Postings that survived the filter.
    pub matched: usize,
}

/// Same logic the `/api/feed` handler runs, purely functional.
pub fn derive_feed<'a>(
    postings: &'a [NormalizedJobPosting],
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> FeedView<'a> {
    let filtered = filter(postings, criteria, now);
    let sorted = sort_postings(filtered, criteria.sort);
    let groups = group_by_company(&sorted);
    let group_keys = groups.keys().collect();

    FeedView {
        criteria: criteria.clone(),
        matched: sorted.len(),
        total: postings.len(),
        group_keys,
        groups,
        companies: company_facet(postings),
        countries: country_facet(postings),
        summary: summarize(criteria),
    }
}

/// Human-readable list of the active criteria, e.g. for a "filters applied" bar.
/// Neutral criteria contribute nothing except the sort order, which is always shown.
pub fn summarize(criteria: &FilterCriteria) -> Vec<String> {
    let mut out = Vec::new();

    let search = criteria.search_text.trim();
    if !search.is_empty() {
        out.push(format!("Search: \"{search}\""));
    }
    if let Some(company) = criteria.company_constraint() {
        out.push(format!("Company: {company}"));
    }
    if !criteria.countries.is_empty() {
        let list = criteria
            .countries
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        out.push(format!("Countries: {list}"));
    }
    match criteria.date_preset {
        DatePreset::All => {}
        DatePreset::Custom => {
            let start = criteria.custom_range.start.as_deref().unwrap_or("…");
            let end = criteria.custom_range.end.as_deref().unwrap_or("…");
            out.push(format!("Posted: {start} to {end}"));
        }
        preset => out.push(format!("Posted: {}", preset.describe())),
    }
    out.push(
        match criteria.sort {
            SortDirection::Newest => "Sort: newest first",
            SortDirection::Oldest => "Sort: oldest first",
        }
        .to_string(),
    );

    out
}
