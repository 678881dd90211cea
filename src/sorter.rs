//! Stable ordering of postings by their cached timestamp.

use serde::{Deserialize, Serialize};

use crate::posting::NormalizedJobPosting;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Newest,
    Oldest,
}

impl SortDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            _ => None,
        }
    }
}

/// Sort by timestamp; `Newest` descending, `Oldest` ascending. Ties keep the
/// order they arrived in (`sort_by` is stable and the comparator is never
/// reversed after the fact).
pub fn sort_postings(
    mut postings: Vec<&NormalizedJobPosting>,
    direction: SortDirection,
) -> Vec<&NormalizedJobPosting> {
    match direction {
        SortDirection::Newest => postings.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms)),
        SortDirection::Oldest => postings.sort_by(|a, b| a.timestamp_ms.cmp(&b.timestamp_ms)),
    }
    postings
}
