//! # Location Normalizer
//! Maps a free-text job location ("Bangalore, IN", "London, United Kingdom")
//! to a canonical country label.
//!
//! Rules are tried in table order and the first rule with any matching alias
//! wins, so a string naming two countries resolves by table priority, never by
//! where the names appear in the text. Unmatched strings fall back to their
//! last comma-separated segment ("Building 3, Paris" -> "Paris").

use once_cell::sync::Lazy;
use regex::Regex;

struct CountryRule {
    label: &'static str,
    aliases: &'static [&'static str],
}

const COUNTRY_RULES: &[CountryRule] = &[
    CountryRule {
        label: "India",
        aliases: &["INDIA", "IN", "IND"],
    },
    CountryRule {
        label: "USA",
        aliases: &["USA", "US", "UNITED STATES", "AMERICA", "U.S.A."],
    },
    CountryRule {
        label: "UK",
        aliases: &["UK", "UNITED KINGDOM", "GB", "GREAT BRITAIN", "U.K."],
    },
    CountryRule {
        label: "Canada",
        aliases: &["CANADA", "CA", "CAN"],
    },
    CountryRule {
        label: "Singapore",
        aliases: &["SINGAPORE", "SG", "SGP"],
    },
    CountryRule {
        label: "Germany",
        aliases: &["GERMANY", "DE", "GER"],
    },
    CountryRule {
        label: "Australia",
        aliases: &["AUSTRALIA", "AU", "AUS"],
    },
];

/// One compiled alternation per rule. An alias must be delimited by a
/// non-word character or the string edge on both sides; this also lets
/// dotted aliases like `U.S.A.` match at the end of a string.
static COUNTRY_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    COUNTRY_RULES
        .iter()
        .map(|rule| {
            let alternation = rule
                .aliases
                .iter()
                .map(|a| regex::escape(a))
                .collect::<Vec<_>>()
                .join("|");
            let re = Regex::new(&format!(r"(?i)(?:^|\W)(?:{alternation})(?:\W|$)"))
                .expect("country alias regex");
            (rule.label, re)
        })
        .collect()
});

/// Normalize one raw location string.
///
/// Returns `None` for absent/empty input and for anything mentioning "remote".
pub fn normalize(raw: Option<&str>) -> Option<String> {
    let raw = raw.filter(|s| !s.is_empty())?;
    if raw.to_lowercase().contains("remote") {
        return None;
    }

    let probe = raw.trim().to_uppercase();
    if let Some((label, _)) = COUNTRY_PATTERNS.iter().find(|(_, re)| re.is_match(&probe)) {
        return Some((*label).to_string());
    }

    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}
