use std::fmt;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder instant for timestamps that are missing or unreadable in storage.
///
/// `0001-01-01T00:00:00+00:00`, the earliest instant the stored text format
/// has always been able to express.
pub fn min_instant() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
        .fixed_offset()
}

/// Current time in UTC, carried with an explicit zero offset.
pub fn now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

/// A flat stored record. `id` is the identity key; an empty id means
/// "not assigned yet" and gets filled in on save.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: String::new(),
            created_at: min_instant(),
            updated_at: min_instant(),
        }
    }
}

impl Item {
    /// New record whose both timestamps are the same instant.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            created_at: at,
            updated_at: at,
        }
    }

    /// Stamp a freshly received record: created and updated become `at`.
    pub fn stamp_created(&mut self, at: DateTime<FixedOffset>) {
        self.created_at = at;
        self.updated_at = at;
    }

    /// Overwrite the mutable fields and refresh `updated_at`; `created_at` is kept.
    pub fn apply_update(&mut self, name: String, description: String, at: DateTime<FixedOffset>) {
        self.name = name;
        self.description = description;
        self.updated_at = at;
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Item{{id='{}', name='{}', description='{}', createdAt={}, updatedAt={}}}",
            self.id, self.name, self.description, self.created_at, self.updated_at
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn json_uses_camel_case_and_rfc3339() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T10:20:30.123456789+02:00").unwrap();
        let item = Item::new("42", "test-key", "v", at);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "42");
        assert_eq!(json["name"], "test-key");
        assert_eq!(json["createdAt"], "2024-05-01T10:20:30.123456789+02:00");
        assert_eq!(json["updatedAt"], json["createdAt"]);
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn missing_json_fields_take_defaults() {
        let item: Item = serde_json::from_str(r#"{"name":"test-key","description":"v"}"#).unwrap();
        assert_eq!(item.id, "");
        assert!(!item.has_id());
        assert_eq!(item.name, "test-key");
        assert_eq!(item.created_at, min_instant());
        assert_eq!(item.updated_at, min_instant());
    }

    #[test]
    fn apply_update_keeps_created_at() {
        let t0 = now();
        let mut item = Item::new("1", "a", "b", t0);
        let t1 = t0 + Duration::seconds(5);
        item.apply_update("c".into(), String::new(), t1);
        assert_eq!(item.name, "c");
        assert_eq!(item.description, "");
        assert_eq!(item.created_at, t0);
        assert_eq!(item.updated_at, t1);
    }

    #[test]
    fn min_instant_is_year_one_utc() {
        assert_eq!(min_instant().to_rfc3339(), "0001-01-01T00:00:00+00:00");
    }

    #[test]
    fn display_lists_all_fields() {
        let item = Item::new("7", "n", "d", min_instant());
        let s = item.to_string();
        assert!(s.starts_with("Item{id='7', name='n', description='d'"));
    }
}
