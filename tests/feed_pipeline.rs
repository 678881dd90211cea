// tests/feed_pipeline.rs
//
// End-to-end derivation over the stored listing fixture:
// decode -> enrich -> filter -> sort -> group, plus facets.

use chrono::{DateTime, TimeZone, Utc};
use jobboard::ingest::decode_postings;
use jobboard::ingest::types::FetchRequest;
use jobboard::{
    derive_feed, enrich, filter, group_by_company, sort_postings, DatePreset, FilterCriteria,
    JobPosting, NormalizedJobPosting, SortDirection, UNKNOWN_COMPANY,
};

const FIXTURE: &str = include_str!("fixtures/jobs.json");

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap()
}

fn collection() -> Vec<NormalizedJobPosting> {
    let (raw, skipped) = decode_postings(FIXTURE).expect("fixture decodes");
    assert_eq!(skipped, 1, "the bare number entry is skipped");
    enrich(raw)
}

/// Last digit of the fixture's object id, enough to tell postings apart.
fn tag(p: &NormalizedJobPosting) -> char {
    p.posting
        .id
        .as_deref()
        .and_then(|id| id.chars().last())
        .unwrap_or('?')
}

fn tags(list: &[&NormalizedJobPosting]) -> String {
    list.iter().map(|p| tag(p)).collect()
}

#[test]
fn enrichment_derives_countries_and_timestamps() {
    let all = collection();
    assert_eq!(all.len(), 5);

    assert_eq!(all[0].normalized_countries, vec!["India"]);
    assert_eq!(all[1].normalized_countries, vec!["USA", "Canada"]);
    assert!(all[2].normalized_countries.is_empty(), "remote yields nothing");
    assert_eq!(all[3].normalized_countries, vec!["Paris"]);
    assert_eq!(all[4].normalized_countries, vec!["UK"]);

    // createdAt is the fallback, an unparsable postedAt means the epoch
    assert_eq!(
        all[2].timestamp_ms,
        Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0)
            .unwrap()
            .timestamp_millis()
    );
    assert_eq!(all[4].timestamp_ms, 0);
}

#[test]
fn records_stay_as_received_and_cards_carry_clean_text() {
    let all = collection();
    assert_eq!(all[3].posting.title.as_deref(), Some("Product&nbsp;Designer"));
    let card = all[3].card();
    assert_eq!(card.display_title.as_deref(), Some("Product Designer"));
    assert_eq!(card.display_company, "Acme");
    assert_eq!(all[3].work_location_label(), "Onsite");
    assert_eq!(all[0].work_location_label(), "Hybrid");
}

#[test]
fn company_facet_value_round_trips_into_fetch_request() {
    let (raw, _) = decode_postings(
        r#"[{"name":"A","companyName":"Acme  &amp;  Co"},{"name":"B","companyName":"Zed"}]"#,
    )
    .unwrap();
    assert_eq!(raw[0].company_name.as_deref(), Some("Acme  &amp;  Co"));

    let all = enrich(raw);
    let view = derive_feed(&all, &FilterCriteria::default(), now());
    assert_eq!(view.companies, vec!["All", "Acme  &amp;  Co", "Zed"]);

    let request = FetchRequest::new("", &view.companies[1]);
    assert_eq!(request.company.as_deref(), Some("Acme  &amp;  Co"));

    let picked = FilterCriteria::default().with_company(view.companies[1].clone());
    assert_eq!(filter(&all, &picked, now()).len(), 1);
}

#[test]
fn company_and_country_filters_are_conjunctive() {
    let all = collection();
    let criteria = FilterCriteria::default()
        .with_company("Acme")
        .with_countries(["USA"]);
    let out = filter(&all, &criteria, now());
    assert_eq!(tags(&out), "2");

    let any_of = FilterCriteria::default().with_countries(["UK", "India"]);
    assert_eq!(tags(&filter(&all, &any_of, now())), "15");
}

#[test]
fn neutral_criteria_keep_everything() {
    let all = collection();
    let criteria = FilterCriteria::default();
    assert!(criteria.is_neutral());
    assert_eq!(filter(&all, &criteria, now()).len(), all.len());
}

#[test]
fn date_presets_against_fixture() {
    let all = collection();
    let last10 = FilterCriteria::default().with_date_preset(DatePreset::Last10);
    assert_eq!(tags(&filter(&all, &last10, now())), "14");

    let this_year = FilterCriteria::default().with_date_preset(DatePreset::ThisYear);
    assert_eq!(tags(&filter(&all, &this_year, now())), "124");
}

#[test]
fn grouping_keys_sort_alphabetically_while_facet_keeps_fetch_order() {
    let all = collection();
    let view = derive_feed(&all, &FilterCriteria::default(), now());

    assert_eq!(view.group_keys, vec!["Acme", UNKNOWN_COMPANY, "Zed"]);
    assert_eq!(view.companies, vec!["All", "Zed", "Acme"]);
    assert_eq!(view.countries, vec!["Canada", "India", "Paris", "UK", "USA"]);
    assert_eq!(view.total, 5);
    assert_eq!(view.matched, 5);

    // newest first inside each group
    assert_eq!(tags(view.groups.get("Acme").unwrap()), "42");
    assert_eq!(tags(view.groups.get("Zed").unwrap()), "13");
    assert_eq!(tags(&view.groups.flatten()), "42513");
}

#[test]
fn oldest_first_reverses_within_groups() {
    let all = collection();
    let criteria = FilterCriteria::default().with_sort(SortDirection::Oldest);
    let view = derive_feed(&all, &criteria, now());
    assert_eq!(tags(&view.groups.flatten()), "24531");
    assert_eq!(view.summary, vec!["Sort: oldest first"]);
}

#[test]
fn facets_ignore_the_active_filter() {
    let all = collection();
    let criteria = FilterCriteria::default().with_company("Zed");
    let view = derive_feed(&all, &criteria, now());
    assert_eq!(view.matched, 2);
    assert_eq!(view.companies, vec!["All", "Zed", "Acme"]);
    assert_eq!(view.countries.len(), 5);
    assert_eq!(view.group_keys, vec!["Zed"]);
}

#[test]
fn equal_timestamps_keep_input_order() {
    let mk = |id: &str| {
        NormalizedJobPosting::from_posting(JobPosting {
            id: Some(id.into()),
            company_name: Some("Acme".into()),
            posted_at: Some("2025-06-01".into()),
            ..Default::default()
        })
    };
    let all = vec![mk("a"), mk("b"), mk("c")];
    let refs: Vec<_> = all.iter().collect();

    for dir in [SortDirection::Newest, SortDirection::Oldest] {
        let sorted = sort_postings(refs.clone(), dir);
        let ids: Vec<_> = sorted.iter().filter_map(|p| p.posting.id.as_deref()).collect();
        assert_eq!(ids, vec!["a", "b", "c"], "{dir:?}");
    }
}

#[test]
fn flatten_is_a_permutation_of_the_filtered_set() {
    let all = collection();
    let criteria = FilterCriteria::default().with_date_preset(DatePreset::ThisYear);
    let filtered = filter(&all, &criteria, now());
    let grouped = group_by_company(&sort_postings(filtered.clone(), criteria.sort));

    let mut a = tags(&filtered).chars().collect::<Vec<_>>();
    let mut b = tags(&grouped.flatten()).chars().collect::<Vec<_>>();
    a.sort_unstable();
    b.sort_unstable();
    assert_eq!(a, b);
    assert_eq!(grouped.posting_count(), filtered.len());
}

#[test]
fn feed_view_serializes_job_cards() {
    let all = collection();
    let view = derive_feed(&all, &FilterCriteria::default(), now());
    let json = serde_json::to_value(&view).unwrap();

    let groups = json["groups"].as_array().unwrap();
    assert_eq!(groups[0]["company"], "Acme");
    assert_eq!(groups[0]["count"], 2);
    let card = &groups[0]["postings"][0];
    assert_eq!(card["name"], "Product&nbsp;Designer");
    assert_eq!(card["displayTitle"], "Product Designer");
    assert_eq!(card["primaryLocation"], "Building 3, Paris");
    assert_eq!(card["workLocation"], "Onsite");
    assert_eq!(card["normalizedCountries"][0], "Paris");
    assert_eq!(json["criteria"]["company"], "All");
}
