// tests/date_window.rs
use chrono::{DateTime, TimeZone, Utc};
use jobboard::window::{in_window, CustomRange, DatePreset};

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn ms(y: i32, m: u32, d: u32) -> i64 {
    at(y, m, d).timestamp_millis()
}

#[test]
fn last10_includes_recent_and_excludes_older() {
    let now = at(2025, 6, 15);
    assert!(in_window(ms(2025, 6, 10), DatePreset::Last10, None, now));
    assert!(in_window(ms(2025, 6, 5), DatePreset::Last10, None, now));
    assert!(!in_window(ms(2025, 6, 1), DatePreset::Last10, None, now));
}

#[test]
fn this_year_starts_on_january_first() {
    let now = at(2025, 6, 15);
    assert!(in_window(ms(2025, 1, 1), DatePreset::ThisYear, None, now));
    assert!(!in_window(ms(2024, 12, 31), DatePreset::ThisYear, None, now));
}

#[test]
fn last_month_uses_calendar_month() {
    let now = at(2025, 6, 15);
    assert!(in_window(ms(2025, 5, 15), DatePreset::LastMonth, None, now));
    assert!(!in_window(ms(2025, 5, 14), DatePreset::LastMonth, None, now));
}

#[test]
fn epoch_fails_everything_but_all() {
    let now = at(2025, 6, 15);
    let range = CustomRange::new("2025-01-01", "2025-12-31");
    assert!(in_window(0, DatePreset::All, None, now));
    for preset in [DatePreset::Last10, DatePreset::LastMonth, DatePreset::ThisYear] {
        assert!(!in_window(0, preset, None, now), "{preset:?}");
    }
    assert!(!in_window(0, DatePreset::Custom, Some(&range), now));
}

#[test]
fn custom_range_is_inclusive_on_both_days() {
    let now = at(2025, 6, 15);
    let range = CustomRange::new("2025-03-01", "2025-03-31");
    assert!(in_window(ms(2025, 3, 1), DatePreset::Custom, Some(&range), now));
    assert!(in_window(ms(2025, 4, 1) - 1, DatePreset::Custom, Some(&range), now));
    assert!(!in_window(ms(2025, 4, 1), DatePreset::Custom, Some(&range), now));
    assert!(!in_window(ms(2025, 2, 28), DatePreset::Custom, Some(&range), now));
}

// Current behavior, kept on purpose although it is questionable: a custom
// range with only one bound filled in excludes nothing.
#[test]
fn custom_range_with_one_bound_passes_everything() {
    let now = at(2025, 6, 15);
    let start_only = CustomRange {
        start: Some("2025-06-01".into()),
        end: None,
    };
    let end_only = CustomRange {
        start: None,
        end: Some("2025-06-01".into()),
    };
    assert!(in_window(ms(2020, 1, 1), DatePreset::Custom, Some(&start_only), now));
    assert!(in_window(ms(2025, 6, 14), DatePreset::Custom, Some(&end_only), now));
    assert!(in_window(0, DatePreset::Custom, None, now));
}

#[test]
fn custom_range_with_unparsable_bound_passes_everything() {
    let now = at(2025, 6, 15);
    let bad = CustomRange::new("06/01/2025", "2025-06-30");
    assert!(in_window(ms(2020, 1, 1), DatePreset::Custom, Some(&bad), now));
}
