//! # Facet List Builder
//! Option lists for the company and country filter controls. Both are built
//! from the full fetched collection, never from the filtered result, so
//! picking a filter value never makes the other values disappear.

use std::cmp::Ordering;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::filter::ALL_COMPANIES;
use crate::posting::NormalizedJobPosting;

/// `["All", ...]` followed by company names in first-seen (fetch) order.
///
/// Postings without a company name contribute nothing: there is no exact
/// company value to filter them by.
pub fn company_facet(postings: &[NormalizedJobPosting]) -> Vec<String> {
    let mut out = vec![ALL_COMPANIES.to_string()];
    for p in postings {
        if let Some(name) = p.posting.company() {
            if !out.iter().skip(1).any(|seen| seen == name) {
                out.push(name.to_string());
            }
        }
    }
    out
}

/// Every normalized country across the collection, deduplicated and sorted
/// alphabetically in a locale-friendly way.
pub fn country_facet(postings: &[NormalizedJobPosting]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for country in postings.iter().flat_map(|p| p.normalized_countries.iter()) {
        if !out.contains(country) {
            out.push(country.clone());
        }
    }
    out.sort_by(|a, b| locale_cmp(a, b));
    out
}

/// Accent- and case-insensitive comparison, with code point order as the
/// tie-breaker so the result is total and deterministic.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
