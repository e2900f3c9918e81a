//! Date resolution, floor grouping and report rendering

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use super::error::MenuError;
use super::feed::{day_entries, MealEntry, MenuFeed};

/// Day names indexed by `num_days_from_monday()` (Monday = 0)
const WEEKDAY_NAMES: [&str; 7] = [
    "월요일", "화요일", "수요일", "목요일", "금요일", "토요일", "일요일",
];

/// Campus label shown in the report header
const LOCATION_LABEL: &str = "서울 캠퍼스";

const HEADER_RULE: &str = "========================================";
const FLOOR_RULE: &str = "--------------------";

/// Word accepted in place of a date to mean "latest day in the feed"
pub const LATEST_MARKER: &str = "latest";

/// A menu request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuQuery {
    /// `YYYY-MM-DD`, or None / "" / "latest" for the first day in the feed
    pub date: Option<String>,

    /// Case-insensitive floor filter; None or "" shows every floor
    pub floor: Option<String>,
}

impl MenuQuery {
    pub fn new(date: Option<&str>, floor: Option<&str>) -> Self {
        Self {
            date: date.map(str::to_string),
            floor: floor.map(str::to_string),
        }
    }

    fn floor_filter(&self) -> Option<&str> {
        self.floor.as_deref().map(str::trim).filter(|f| !f.is_empty())
    }
}

/// Look up and render a menu, returning a report or an error string.
///
/// Never fails: every error is rendered as a line starting with `Error: `.
pub fn get_meal_menu(feed: &MenuFeed, date: Option<&str>, floor: Option<&str>) -> String {
    match format_menu(feed, &MenuQuery::new(date, floor)) {
        Ok(report) => report,
        Err(e) => e.to_string(),
    }
}

/// Look up and render a menu
pub fn format_menu(feed: &MenuFeed, query: &MenuQuery) -> Result<String, MenuError> {
    let (key, date) = resolve_date(feed, query.date.as_deref())?;
    let floor = query.floor_filter();

    tracing::debug!(date = %key, floor = ?floor, "formatting menu");

    let entries = day_entries(feed, &key)?;
    let by_floor = group_by_floor(&entries, floor);

    if by_floor.is_empty() {
        return Err(MenuError::NoMatchingEntries {
            date: key,
            floor: floor.unwrap_or_default().to_string(),
        });
    }

    Ok(render(&key, weekday_name(date), floor, &by_floor))
}

// ============================================================================
// Date resolution
// ============================================================================

fn is_latest_marker(date: Option<&str>) -> bool {
    match date.map(str::trim) {
        None => true,
        Some(d) => d.is_empty() || d.eq_ignore_ascii_case(LATEST_MARKER),
    }
}

/// Resolve the requested date to a feed key and a calendar date
fn resolve_date(feed: &MenuFeed, requested: Option<&str>) -> Result<(String, NaiveDate), MenuError> {
    let input = if is_latest_marker(requested) {
        let latest = feed.keys().next().ok_or(MenuError::NoDataAvailable)?;
        tracing::debug!(date = %latest, "resolved latest date");
        latest.as_str()
    } else {
        requested.unwrap_or_default()
    };

    let key = input.trim();
    let date = parse_calendar_date(key)
        .ok_or_else(|| MenuError::InvalidDateFormat(input.to_string()))?;

    Ok((key.to_string(), date))
}

/// Strict `YYYY-MM-DD`: zero-padded, and an actual calendar day
fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    let bytes = input.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    WEEKDAY_NAMES[date.weekday().num_days_from_monday() as usize]
}

// ============================================================================
// Grouping and rendering
// ============================================================================

/// A retained entry with its name already joined onto one line
struct Line<'a> {
    meal_type: &'a str,
    name: String,
}

/// Bucket entries by raw floor string; BTreeMap keeps floors sorted
fn group_by_floor<'a>(entries: &'a [MealEntry], floor: Option<&str>) -> BTreeMap<&'a str, Vec<Line<'a>>> {
    let mut by_floor: BTreeMap<&str, Vec<Line>> = BTreeMap::new();

    for entry in entries {
        if let Some(floor) = floor {
            if !entry.on_floor(floor) {
                continue;
            }
        }
        by_floor.entry(entry.floor.as_str()).or_default().push(Line {
            meal_type: entry.meal_type(),
            name: entry.display_name(),
        });
    }

    by_floor
}

fn render(date: &str, weekday: &str, floor: Option<&str>, by_floor: &BTreeMap<&str, Vec<Line>>) -> String {
    let floor_info = floor.map(|f| format!("{} ", f)).unwrap_or_default();

    let mut out = format!(
        "📅 {} ({}) - {} {}식단 메뉴 📋\n",
        date, weekday, LOCATION_LABEL, floor_info
    );
    out.push_str(HEADER_RULE);
    out.push('\n');

    for (floor, lines) in by_floor {
        out.push_str(&format!("📍 {}\n", floor));
        for line in lines {
            out.push_str(&format!("  - {}: {}\n", line.meal_type, line.name));
        }
        out.push_str(FLOOR_RULE);
        out.push('\n');
    }

    out.push_str(HEADER_RULE);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::feed::parse_feed;

    const SAMPLE: &str = r#"{
        "2025-10-23": [
            {"floor": "10F", "type": "중식", "name": "Rice\nSoup"},
            {"floor": "20F", "type": "중식", "name": "Noodles"}
        ],
        "2025-10-22": [
            {"floor": "20F", "type": "중식", "name": "Bibimbap"}
        ]
    }"#;

    fn sample() -> MenuFeed {
        parse_feed(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_all_floors() {
        let report = get_meal_menu(&sample(), Some("2025-10-23"), None);
        let ten = report.find("📍 10F").unwrap();
        let twenty = report.find("📍 20F").unwrap();
        assert!(ten < twenty);
        assert!(report.contains("  - 중식: Rice, Soup\n"));
        assert!(report.contains("  - 중식: Noodles\n"));
        assert!(report.starts_with("📅 2025-10-23 (목요일) - 서울 캠퍼스 식단 메뉴 📋\n"));
    }

    #[test]
    fn test_exact_layout() {
        let report = get_meal_menu(&sample(), Some("2025-10-22"), None);
        let expected = format!(
            "📅 2025-10-22 (수요일) - 서울 캠퍼스 식단 메뉴 📋\n{rule}\n📍 20F\n  - 중식: Bibimbap\n{floor}\n{rule}",
            rule = "=".repeat(40),
            floor = "-".repeat(20),
        );
        assert_eq!(report, expected);
    }

    #[test]
    fn test_floor_filter() {
        let report = get_meal_menu(&sample(), Some("2025-10-23"), Some("20F"));
        assert!(report.contains("📍 20F"));
        assert!(!report.contains("📍 10F"));
        assert!(report.contains("서울 캠퍼스 20F 식단 메뉴"));
    }

    #[test]
    fn test_floor_filter_ignores_case() {
        let report = get_meal_menu(&sample(), Some("2025-10-23"), Some("10f"));
        assert!(report.contains("📍 10F"));
        assert!(!report.contains("📍 20F"));
    }

    #[test]
    fn test_blank_floor_means_all() {
        let report = get_meal_menu(&sample(), Some("2025-10-23"), Some("  "));
        assert!(report.contains("📍 10F"));
        assert!(report.contains("📍 20F"));
    }

    #[test]
    fn test_no_matching_entries() {
        let err = format_menu(&sample(), &MenuQuery::new(Some("2025-10-23"), Some("30F"))).unwrap_err();
        assert_eq!(
            err,
            MenuError::NoMatchingEntries {
                date: "2025-10-23".to_string(),
                floor: "30F".to_string(),
            }
        );
        assert!(err.is_soft());
    }

    #[test]
    fn test_date_not_found() {
        let out = get_meal_menu(&sample(), Some("2025-10-24"), None);
        assert!(out.starts_with("Error: "));
        assert!(out.contains("2025-10-24"));
    }

    #[test]
    fn test_latest_marker() {
        for marker in [None, Some(""), Some("latest"), Some("LATEST")] {
            let report = get_meal_menu(&sample(), marker, None);
            assert!(report.starts_with("📅 2025-10-23 (목요일)"), "{:?}", marker);
        }
    }

    #[test]
    fn test_latest_is_first_key_not_max() {
        let feed = parse_feed(br#"{"2025-10-20": [{"floor": "10F"}], "2025-10-31": [{"floor": "10F"}]}"#).unwrap();
        let report = get_meal_menu(&feed, None, None);
        assert!(report.starts_with("📅 2025-10-20 (월요일)"));
    }

    #[test]
    fn test_latest_on_empty_feed() {
        let err = format_menu(&MenuFeed::new(), &MenuQuery::default()).unwrap_err();
        assert_eq!(err, MenuError::NoDataAvailable);
    }

    #[test]
    fn test_invalid_dates_echo_input() {
        for bad in ["2025-13-40", "tomorrow", "2025-02-30", "2025-1-5", "20251023", "2025/10/23"] {
            let err = format_menu(&sample(), &MenuQuery::new(Some(bad), None)).unwrap_err();
            assert_eq!(err, MenuError::InvalidDateFormat(bad.to_string()));
            assert!(err.to_string().contains(bad));
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_tolerated() {
        let report = get_meal_menu(&sample(), Some(" 2025-10-23 "), None);
        assert!(report.starts_with("📅 2025-10-23 "));
    }

    #[test]
    fn test_weekday_names() {
        let cases = [
            ("2025-10-20", "월요일"),
            ("2025-10-21", "화요일"),
            ("2025-10-22", "수요일"),
            ("2025-10-23", "목요일"),
            ("2025-10-24", "금요일"),
            ("2025-10-25", "토요일"),
            ("2025-10-26", "일요일"),
            ("2024-02-29", "목요일"),
            ("2000-01-01", "토요일"),
        ];
        for (date, name) in cases {
            assert_eq!(weekday_name(parse_calendar_date(date).unwrap()), name, "{}", date);
        }
    }

    #[test]
    fn test_floors_sorted_regardless_of_feed_order() {
        let feed = parse_feed(
            r#"{"2025-10-23": [
                {"floor": "20F", "type": "중식", "name": "A"},
                {"floor": "10F", "type": "석식", "name": "B"},
                {"floor": "20F", "type": "석식", "name": "C"}
            ]}"#
            .as_bytes(),
        )
        .unwrap();
        let report = get_meal_menu(&feed, Some("2025-10-23"), None);
        let ten = report.find("📍 10F").unwrap();
        let twenty = report.find("📍 20F").unwrap();
        assert!(ten < twenty);
        // original order within a floor
        let a = report.find("중식: A").unwrap();
        let c = report.find("석식: C").unwrap();
        assert!(a < c);
    }

    #[test]
    fn test_idempotent_and_feed_untouched() {
        let feed = sample();
        let before = feed.clone();
        let first = get_meal_menu(&feed, Some("2025-10-23"), Some("10F"));
        let second = get_meal_menu(&feed, Some("2025-10-23"), Some("10F"));
        assert_eq!(first, second);
        assert_eq!(feed, before);
    }

    #[test]
    fn test_malformed_day() {
        let feed = parse_feed(br#"{"2025-10-23": "closed"}"#).unwrap();
        let out = get_meal_menu(&feed, Some("2025-10-23"), None);
        assert!(out.starts_with("Error: "));
        assert!(out.contains("2025-10-23"));
    }
}
