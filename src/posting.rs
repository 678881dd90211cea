//! # Postings
//! Job posting records as delivered by the listing service, and the one-time
//! enrichment pass that attaches derived fields (countries, numeric timestamp).
//!
//! Decoding is tolerant: the listing service stores loosely-typed documents, so
//! a record is built from any JSON object and wrong-typed fields simply become
//! absent. The enrichment pass never mutates the fetched record; it wraps it in
//! a `NormalizedJobPosting`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

use crate::location;

/// Group key used for postings without a company name.
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

/// Label shown when the listing does not say where the work happens.
pub const DEFAULT_WORK_LOCATION: &str = "Onsite";

/// Longest display text shown on a card.
const MAX_DISPLAY_CHARS: usize = 300;

/// One job opening as received from the listing service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct JobPosting {
    pub id: Option<String>,
    #[serde(rename = "name")]
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub department: Option<String>,
    pub locations: Vec<String>,
    pub work_location_option: Option<String>,
    pub posted_at: Option<String>,
    pub created_at: Option<String>,
    pub position_url: Option<String>,
}

impl From<Value> for JobPosting {
    fn from(value: Value) -> Self {
        let field = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| value.get(*k).and_then(scalar_to_string))
        };
        Self {
            id: field(&["id", "_id"]),
            title: field(&["name", "title"]),
            company_name: field(&["companyName"]),
            department: field(&["department"]),
            locations: value.get("locations").map(string_list).unwrap_or_default(),
            work_location_option: field(&["workLocationOption"]),
            posted_at: field(&["postedAt"]),
            created_at: field(&["createdAt"]),
            position_url: field(&["positionUrl"]),
        }
    }
}

/// Strings pass through, numbers are stringified, Mongo extended JSON
/// (`{"$oid": ..}`, `{"$date": ..}`) is unwrapped. Anything else is absent.
fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map
            .get("$oid")
            .or_else(|| map.get("$date"))
            .or_else(|| map.get("$numberLong"))
            .and_then(scalar_to_string),
        _ => None,
    }
}

fn string_list(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

impl JobPosting {
    /// Company name, or `None` when missing or blank.
    pub fn company(&self) -> Option<&str> {
        self.company_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }
}

/// A posting plus the fields the pipeline derives from it exactly once per fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedJobPosting {
    #[serde(flatten)]
    pub posting: JobPosting,
    /// Canonical country labels, in location order, without duplicates.
    pub normalized_countries: Vec<String>,
    /// Milliseconds since the Unix epoch; `0` when no timestamp parses.
    #[serde(rename = "postedAtMs")]
    pub timestamp_ms: i64,
}

impl NormalizedJobPosting {
    pub fn from_posting(posting: JobPosting) -> Self {
        let normalized_countries = derive_countries(&posting.locations);
        let timestamp_ms = posting_timestamp(&posting);
        Self {
            posting,
            normalized_countries,
            timestamp_ms,
        }
    }

    /// Grouping key: the company name, or `"Unknown Company"`.
    pub fn company_key(&self) -> &str {
        self.posting.company().unwrap_or(UNKNOWN_COMPANY)
    }

    pub fn primary_location(&self) -> Option<&str> {
        self.posting.locations.first().map(String::as_str)
    }

    pub fn work_location_label(&self) -> &str {
        self.posting
            .work_location_option
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_WORK_LOCATION)
    }

    pub fn card(&self) -> JobCard<'_> {
        JobCard {
            posting: self,
            display_title: self.posting.title.as_deref().map(display_text),
            display_company: display_text(self.company_key()),
            primary_location: self.primary_location(),
            work_location: self.work_location_label(),
        }
    }
}

/// Serialized shape of a posting in feed responses: the enriched record,
/// untouched, plus the display conveniences a job card needs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCard<'a> {
    #[serde(flatten)]
    pub posting: &'a NormalizedJobPosting,
    pub display_title: Option<String>,
    pub display_company: String,
    pub primary_location: Option<&'a str>,
    pub work_location: &'a str,
}

/// Scraped listing text made presentable: entities decoded, tags stripped,
/// whitespace (NBSP included) collapsed, length capped.
pub fn display_text(s: &str) -> String {
    static RE_TAGS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?is)</?[a-z][^>]*>").expect("tag regex"));
    static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

    let decoded = html_escape::decode_html_entities(s);
    let stripped = RE_TAGS.replace_all(&decoded, "");
    let collapsed = RE_WS.replace_all(&stripped, " ");
    collapsed.trim().chars().take(MAX_DISPLAY_CHARS).collect()
}

/// Enrich a freshly fetched collection. Input order is preserved.
pub fn enrich(postings: Vec<JobPosting>) -> Vec<NormalizedJobPosting> {
    postings
        .into_iter()
        .map(NormalizedJobPosting::from_posting)
        .collect()
}

/// Normalize every raw location; keep first occurrences, drop `None`.
pub fn derive_countries(locations: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in locations {
        if let Some(country) = location::normalize(Some(raw)) {
            if !out.contains(&country) {
                out.push(country);
            }
        }
    }
    out
}

/// `postedAt` if it parses, else `createdAt` if it parses, else the epoch.
pub fn posting_timestamp(posting: &JobPosting) -> i64 {
    posting
        .posted_at
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| posting.created_at.as_deref().and_then(parse_timestamp))
        .unwrap_or(0)
}

/// Parse a listing timestamp into epoch milliseconds.
///
/// Accepted: RFC 3339, naive ISO date-times and plain `YYYY-MM-DD` (read as
/// UTC), RFC 2822, and numeric epochs (13+ digits are milliseconds, 10-12
/// digits are seconds).
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.len() >= 10 && digits.bytes().all(|b| b.is_ascii_digit()) {
        let n: i64 = s.parse().ok()?;
        return Some(if digits.len() >= 13 { n } else { n.saturating_mul(1000) });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc().timestamp_millis());
    }

    OffsetDateTime::parse(s, &Rfc2822)
        .ok()
        .and_then(|dt| i64::try_from(dt.unix_timestamp_nanos() / 1_000_000).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_mongo_shaped_record() {
        let v = json!({
            "_id": {"$oid": "65f0c0ffee"},
            "name": "Backend Engineer",
            "companyName": "Ericsson",
            "locations": ["Bangalore, IN", "Remote"],
            "postedAt": "2025-06-10T08:00:00Z",
            "positionUrl": "https://jobs.example/1"
        });
        let p = JobPosting::from(v);
        assert_eq!(p.id.as_deref(), Some("65f0c0ffee"));
        assert_eq!(p.title.as_deref(), Some("Backend Engineer"));
        assert_eq!(p.locations.len(), 2);
        assert!(p.department.is_none());
    }

    #[test]
    fn wrong_types_degrade_to_absent() {
        let v = json!({
            "id": 42,
            "companyName": null,
            "locations": "Berlin, DE",
            "postedAt": true
        });
        let p = JobPosting::from(v);
        assert_eq!(p.id.as_deref(), Some("42"));
        assert!(p.company_name.is_none());
        assert_eq!(p.locations, vec!["Berlin, DE".to_string()]);
        assert!(p.posted_at.is_none());
    }

    #[test]
    fn timestamp_falls_back_to_created_then_epoch() {
        let mut p = JobPosting {
            posted_at: Some("not a date".into()),
            created_at: Some("2025-01-01".into()),
            ..Default::default()
        };
        assert_eq!(posting_timestamp(&p), 1_735_689_600_000);

        p.created_at = None;
        assert_eq!(posting_timestamp(&p), 0);
    }

    #[test]
    fn parses_common_timestamp_shapes() {
        assert_eq!(parse_timestamp("1970-01-01T00:00:01Z"), Some(1_000));
        assert_eq!(parse_timestamp("1970-01-01T00:00:01.500"), Some(1_500));
        assert_eq!(parse_timestamp("1718000000"), Some(1_718_000_000_000));
        assert_eq!(parse_timestamp("1718000000123"), Some(1_718_000_000_123));
        assert_eq!(
            parse_timestamp("Thu, 01 Jan 1970 00:00:02 +0000"),
            Some(2_000)
        );
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("2025"), None);
    }

    #[test]
    fn countries_keep_order_and_drop_duplicates() {
        let locs = vec![
            "Pune, India".to_string(),
            "Remote".to_string(),
            "Austin, TX, USA".to_string(),
            "Chennai, IN".to_string(),
        ];
        assert_eq!(derive_countries(&locs), vec!["India", "USA"]);
    }

    #[test]
    fn display_text_decodes_and_collapses() {
        let s = "  Senior&nbsp;&nbsp;<b>Rust</b>\n Engineer &amp; Mentor ";
        assert_eq!(display_text(s), "Senior Rust Engineer & Mentor");
        assert_eq!(display_text("Acme Inc."), "Acme Inc.");
        assert_eq!(display_text("a < b"), "a < b");
        assert_eq!(display_text(&"x".repeat(400)).len(), MAX_DISPLAY_CHARS);
    }

    #[test]
    fn card_cleans_display_fields_but_not_the_record() {
        let n = NormalizedJobPosting::from_posting(JobPosting {
            title: Some("Product&nbsp;Designer".into()),
            company_name: Some("Acme  &amp;  Co".into()),
            ..Default::default()
        });
        let card = n.card();
        assert_eq!(card.display_title.as_deref(), Some("Product Designer"));
        assert_eq!(card.display_company, "Acme & Co");
        assert_eq!(n.posting.company_name.as_deref(), Some("Acme  &amp;  Co"));
        assert_eq!(n.company_key(), "Acme  &amp;  Co");
    }

    #[test]
    fn blank_company_groups_as_unknown() {
        let n = NormalizedJobPosting::from_posting(JobPosting {
            company_name: Some("  ".into()),
            ..Default::default()
        });
        assert_eq!(n.company_key(), UNKNOWN_COMPANY);
        assert_eq!(n.work_location_label(), DEFAULT_WORK_LOCATION);
    }
}
