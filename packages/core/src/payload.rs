//! Helpers for working with received payloads.
//!
//! Payloads are arbitrary structured data, modeled with `serde_json::Value`
//! — already the null/bool/number/string/sequence/mapping tagged variant
//! that makes field extraction and canonical rendering total rather than
//! throwing. Missing fields simply return `None`.

use serde_json::{Map, Value};

/// Keys checked, in order, for a record container when the payload
/// itself is not already an array.
const CONTAINER_KEYS: [&str; 3] = ["data", "results", "exploits"];

/// Keys checked for a usable timestamp, on the payload directly or on
/// its first contained record.
const TIMESTAMP_KEYS: [&str; 7] = [
    "timestamp",
    "created_at",
    "updated_at",
    "date",
    "time",
    "datetime",
    "last_updated",
];

/// Render a JSON value into a stable, deterministic string: object keys
/// sorted recursively, arrays preserved in order, primitives passed
/// through. Used as the text compared against the query for semantic
/// coherence scoring.
pub fn canonical_render(value: &Value) -> String {
    serde_json::to_string(&sort_keys(value)).unwrap_or_default()
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sorted = Map::new();
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                sorted.insert(key.clone(), sort_keys(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Find the record container for this payload: the payload itself if it
/// is an array, else the first of `data`/`results`/`exploits` that holds
/// an array, else `None` (the payload is treated as a single record).
pub fn record_container(value: &Value) -> Option<&Vec<Value>> {
    if let Value::Array(items) = value {
        return Some(items);
    }
    if let Value::Object(_) = value {
        for key in CONTAINER_KEYS {
            if let Some(Value::Array(items)) = value.get(key) {
                return Some(items);
            }
        }
    }
    None
}

/// Number of records in the payload, per the record-count extraction
/// rules (array length, known container length, or 1 for a bare record).
pub fn record_count(value: &Value) -> usize {
    record_container(value).map(|items| items.len()).unwrap_or(1)
}

/// The first contained record, or the payload itself if it has no
/// recognized container (treated as a single record).
pub fn first_record(value: &Value) -> Option<&Value> {
    match record_container(value) {
        Some(items) => items.first(),
        None => Some(value),
    }
}

/// Whether `field` is present and non-null/non-empty on `record`.
pub fn field_present(record: &Value, field: &str) -> bool {
    match record.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(_) => true,
    }
}

/// Find the most recent parsable timestamp among recognized fields,
/// checked on the payload root and on its first contained record.
/// Returns a UTC timestamp if any recognized field parses.
pub fn extract_latest_timestamp(value: &Value) -> Option<chrono::DateTime<chrono::Utc>> {
    let mut candidates = Vec::new();

    if let Value::Object(_) = value {
        for key in TIMESTAMP_KEYS {
            if let Some(Value::String(s)) = value.get(key) {
                if let Some(ts) = parse_timestamp(s) {
                    candidates.push(ts);
                }
            }
        }
    }

    if let Some(record) = first_record(value) {
        if let Value::Object(_) = record {
            for key in TIMESTAMP_KEYS {
                if let Some(Value::String(s)) = record.get(key) {
                    if let Some(ts) = parse_timestamp(s) {
                        candidates.push(ts);
                    }
                }
            }
        }
    }

    candidates.into_iter().max()
}

fn parse_timestamp(raw: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&chrono::Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(chrono::DateTime::from_naive_utc_and_offset(naive, chrono::Utc));
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(chrono::DateTime::from_naive_utc_and_offset(
            date.and_hms_opt(0, 0, 0).unwrap(),
            chrono::Utc,
        ));
    }
    None
}
