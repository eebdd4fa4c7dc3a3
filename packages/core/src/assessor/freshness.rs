//! Freshness component (§4.2): linear decay against `max_age_days`.
//!
//! Only assessed when the criteria name a `max_age_days`; otherwise
//! freshness does not apply and defaults to full score.

use serde_json::Value;

use crate::payload;

use super::QualityCriteria;

pub fn score(payload: &Value, criteria: &QualityCriteria) -> (f64, Vec<String>) {
    let max_age = match criteria.max_age_days {
        Some(max_age) if max_age > 0.0 => max_age,
        _ => return (1.0, Vec::new()),
    };

    let latest = match payload::extract_latest_timestamp(payload) {
        Some(ts) => ts,
        None => return (0.5, vec!["No timestamp found for freshness check".to_string()]),
    };

    let age_days = (chrono::Utc::now() - latest).num_seconds() as f64 / 86_400.0;
    let age_days = age_days.max(0.0);

    let score = if age_days <= max_age {
        1.0 - age_days / max_age
    } else {
        (1.0 - age_days / (2.0 * max_age)).max(0.0)
    };

    let mut issues = Vec::new();
    if age_days > max_age {
        issues.push(format!(
            "Data is {:.1} days old, exceeding max age of {:.1} days",
            age_days, max_age
        ));
    }

    (score.clamp(0.0, 1.0), issues)
}
