//! # Filter Engine
//! Conjunctive company / country / date predicates over an enriched
//! collection. Every predicate is skipped when its criterion is neutral.
//!
//! Free-text search is deliberately absent here: the committed search text is
//! sent to the listing service as a request parameter and the returned set is
//! trusted as-is. Re-matching locally would disagree with the server's rules.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::posting::NormalizedJobPosting;
use crate::sorter::SortDirection;
use crate::window::{in_window, CustomRange, DatePreset};

/// Company sentinel meaning "no company constraint".
pub const ALL_COMPANIES: &str = "All";

/// Everything the user can narrow or reorder the feed by.
///
/// `Eq + Hash` so callers can memoize derived output on the value of the
/// criteria; `countries` is a `BTreeSet` so selection order never matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// Last committed search term. Only used as a fetch parameter.
    pub search_text: String,
    pub company: String,
    pub countries: BTreeSet<String>,
    pub date_preset: DatePreset,
    pub custom_range: CustomRange,
    pub sort: SortDirection,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            company: ALL_COMPANIES.to_string(),
            countries: BTreeSet::new(),
            date_preset: DatePreset::All,
            custom_range: CustomRange::default(),
            sort: SortDirection::Newest,
        }
    }
}

impl FilterCriteria {
    /// `Some(name)` unless the company selection is the `"All"` sentinel.
    pub fn company_constraint(&self) -> Option<&str> {
        (self.company != ALL_COMPANIES).then_some(self.company.as_str())
    }

    /// True when no local predicate would exclude anything.
    pub fn is_neutral(&self) -> bool {
        self.company_constraint().is_none()
            && self.countries.is_empty()
            && self.date_preset == DatePreset::All
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_date_preset(mut self, preset: DatePreset) -> Self {
        self.date_preset = preset;
        self
    }

    pub fn with_custom_range(mut self, range: CustomRange) -> Self {
        self.date_preset = DatePreset::Custom;
        self.custom_range = range;
        self
    }

    pub fn with_sort(mut self, sort: SortDirection) -> Self {
        self.sort = sort;
        self
    }
}

/// Keep the postings that satisfy every active predicate, in input order.
pub fn filter<'a>(
    postings: &'a [NormalizedJobPosting],
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> Vec<&'a NormalizedJobPosting> {
    let company = criteria.company_constraint();
    postings
        .iter()
        .filter(|p| company.map_or(true, |c| p.posting.company_name.as_deref() == Some(c)))
        .filter(|p| {
            criteria.countries.is_empty()
                || p
                    .normalized_countries
                    .iter()
                    .any(|c| criteria.countries.contains(c))
        })
        .filter(|p| {
            in_window(
                p.timestamp_ms,
                criteria.date_preset,
                Some(&criteria.custom_range),
                now,
            )
        })
        .collect()
}
