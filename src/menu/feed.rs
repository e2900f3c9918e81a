//! Feed data model
//!
//! The feed is kept as raw JSON per day so a single malformed day is reported
//! for that day only instead of failing the whole decode.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::MenuError;

/// Placeholder shown for a missing meal type or dish name
pub const NOT_AVAILABLE: &str = "N/A";

/// Date-keyed menu feed.
///
/// Key order is the order of the source document; the first key is the
/// most recent date.
pub type MenuFeed = IndexMap<String, Value>;

/// One meal record for a single day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealEntry {
    /// Floor identifier, e.g. "10F"
    pub floor: String,

    /// Meal category (lunch, takeout, ...)
    #[serde(rename = "type", default)]
    pub meal_type: Option<String>,

    /// Dish name, possibly spanning several lines
    #[serde(default)]
    pub name: Option<String>,
}

impl MealEntry {
    pub fn meal_type(&self) -> &str {
        self.meal_type.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Dish name with line breaks joined into a single readable line
    pub fn display_name(&self) -> String {
        join_lines(self.name.as_deref().unwrap_or(NOT_AVAILABLE))
    }

    /// Case-insensitive floor comparison
    pub fn on_floor(&self, floor: &str) -> bool {
        self.floor.to_uppercase() == floor.to_uppercase()
    }
}

/// Replace every line break with ", "
fn join_lines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n").replace('\n', ", ")
}

/// Decode a feed document, keeping key order
pub fn parse_feed(bytes: &[u8]) -> serde_json::Result<MenuFeed> {
    serde_json::from_slice(bytes)
}

/// Decode the entries listed under `date`.
///
/// A missing, null or empty day is `DateNotFound`; anything that is not a
/// list of entry records is `MalformedFeed`.
pub fn day_entries(feed: &MenuFeed, date: &str) -> Result<Vec<MealEntry>, MenuError> {
    let value = match feed.get(date) {
        None | Some(Value::Null) => return Err(MenuError::DateNotFound(date.to_string())),
        Some(value) => value,
    };

    let Value::Array(items) = value else {
        tracing::warn!(date, kind = json_kind(value), "expected a list of entries");
        return Err(MenuError::MalformedFeed {
            date: date.to_string(),
            reason: format!("expected a list, found {}", json_kind(value)),
        });
    };

    if items.is_empty() {
        return Err(MenuError::DateNotFound(date.to_string()));
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            MealEntry::deserialize(item).map_err(|e| {
                tracing::warn!(date, index, error = %e, "undecodable entry");
                MenuError::MalformedFeed {
                    date: date.to_string(),
                    reason: format!("entry {}: {}", index, e),
                }
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feed(value: Value) -> MenuFeed {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_feed_keeps_document_order() {
        let raw = br#"{"2025-10-24": [], "2025-10-22": [], "2025-10-23": []}"#;
        let feed = parse_feed(raw).unwrap();
        let keys: Vec<_> = feed.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["2025-10-24", "2025-10-22", "2025-10-23"]);
    }

    #[test]
    fn test_parse_feed_rejects_non_object() {
        assert!(parse_feed(b"[1, 2, 3]").is_err());
    }

    #[test]
    fn test_display_name_joins_lines() {
        let entry = MealEntry {
            floor: "10F".to_string(),
            meal_type: Some("중식".to_string()),
            name: Some("Rice\nSoup\r\nKimchi".to_string()),
        };
        assert_eq!(entry.display_name(), "Rice, Soup, Kimchi");
        // source value untouched
        assert_eq!(entry.name.as_deref(), Some("Rice\nSoup\r\nKimchi"));
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let entry: MealEntry = serde_json::from_value(json!({"floor": "20F", "name": null})).unwrap();
        assert_eq!(entry.meal_type(), NOT_AVAILABLE);
        assert_eq!(entry.display_name(), NOT_AVAILABLE);
    }

    #[test]
    fn test_on_floor_ignores_case() {
        let entry: MealEntry = serde_json::from_value(json!({"floor": "10F"})).unwrap();
        assert!(entry.on_floor("10f"));
        assert!(entry.on_floor("10F"));
        assert!(!entry.on_floor("20F"));
    }

    #[test]
    fn test_day_entries_missing_and_empty() {
        let feed = feed(json!({"2025-10-23": [], "2025-10-22": null}));
        assert_eq!(
            day_entries(&feed, "2025-10-23"),
            Err(MenuError::DateNotFound("2025-10-23".to_string()))
        );
        assert_eq!(
            day_entries(&feed, "2025-10-22"),
            Err(MenuError::DateNotFound("2025-10-22".to_string()))
        );
        assert_eq!(
            day_entries(&feed, "2025-10-24"),
            Err(MenuError::DateNotFound("2025-10-24".to_string()))
        );
    }

    #[test]
    fn test_day_entries_malformed() {
        let feed = feed(json!({
            "2025-10-23": {"floor": "10F"},
            "2025-10-24": [{"type": "중식", "name": "no floor"}],
        }));
        assert!(matches!(
            day_entries(&feed, "2025-10-23"),
            Err(MenuError::MalformedFeed { .. })
        ));
        match day_entries(&feed, "2025-10-24") {
            Err(MenuError::MalformedFeed { date, reason }) => {
                assert_eq!(date, "2025-10-24");
                assert!(reason.contains("entry 0"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_day_entries_rejects_non_record_elements() {
        let feed = feed(json!({
            "2025-10-23": ["x"],
            "2025-10-24": [{"floor": "10F", "name": "Rice"}, 1],
            "2025-10-25": [{"floor": "10F", "name": "Rice"}, {"floor": null, "name": "Soup"}],
        }));
        for (date, index) in [("2025-10-23", 0), ("2025-10-24", 1), ("2025-10-25", 1)] {
            match day_entries(&feed, date) {
                Err(MenuError::MalformedFeed { date: d, reason }) => {
                    assert_eq!(d, date);
                    assert!(reason.contains(&format!("entry {}", index)), "{}", reason);
                }
                other => panic!("unexpected for {}: {:?}", date, other),
            }
        }
    }

    #[test]
    fn test_day_entries_in_order() {
        let feed = feed(json!({
            "2025-10-23": [
                {"floor": "20F", "type": "중식", "name": "Noodles", "kcal": 700},
                {"floor": "10F", "type": "중식", "name": "Rice"},
            ]
        }));
        let entries = day_entries(&feed, "2025-10-23").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].floor, "20F");
        assert_eq!(entries[1].floor, "10F");
    }
}
