//! Conversion between [`Item`] and the flat string map stored per record.
//!
//! Timestamps are written as RFC 3339 with an explicit offset and as many
//! fractional digits as needed, so reading them back yields the same instant.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::errors::ModelError;
use crate::item::{min_instant, Item};

pub const FIELD_ID: &str = "id";
pub const FIELD_NAME: &str = "name";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_CREATED_AT: &str = "createdAt";
pub const FIELD_UPDATED_AT: &str = "updatedAt";

pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, ModelError> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|e| ModelError::InvalidTimestamp {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// The five stored fields, in a fixed order.
pub fn to_fields(item: &Item) -> Vec<(String, String)> {
    vec![
        (FIELD_ID.to_string(), item.id.clone()),
        (FIELD_NAME.to_string(), item.name.clone()),
        (FIELD_DESCRIPTION.to_string(), item.description.clone()),
        (FIELD_CREATED_AT.to_string(), format_timestamp(&item.created_at)),
        (FIELD_UPDATED_AT.to_string(), format_timestamp(&item.updated_at)),
    ]
}

pub fn to_field_map(item: &Item) -> BTreeMap<String, String> {
    to_fields(item).into_iter().collect()
}

/// Inverse of [`to_fields`]. Absent text fields become empty strings; absent
/// or unparsable timestamps become [`min_instant`]. Never fails.
pub fn from_fields(fields: &HashMap<String, String>) -> Item {
    let text = |key: &str| fields.get(key).cloned().unwrap_or_default();
    let instant = |key: &str| {
        fields
            .get(key)
            .and_then(|v| parse_timestamp(v).ok())
            .unwrap_or_else(min_instant)
    };

    Item {
        id: text(FIELD_ID),
        name: text(FIELD_NAME),
        description: text(FIELD_DESCRIPTION),
        created_at: instant(FIELD_CREATED_AT),
        updated_at: instant(FIELD_UPDATED_AT),
    }
}
