//! Completeness component (§4.2): criterion match (60%) + record count (40%).

use serde_json::Value;

use crate::payload;

use super::QualityCriteria;

pub fn score(payload: &Value, criteria: &QualityCriteria, expected_count: Option<usize>) -> (f64, Vec<String>) {
    let mut issues = Vec::new();

    let criterion_match = match &criteria.required_fields {
        Some(fields) if !fields.is_empty() => {
            let record = payload::first_record(payload);
            let present = fields
                .iter()
                .filter(|field| record.map(|r| payload::field_present(r, field)).unwrap_or(false))
                .count();
            let fraction = present as f64 / fields.len() as f64;
            if present < fields.len() {
                let missing: Vec<&str> = fields
                    .iter()
                    .filter(|field| !record.map(|r| payload::field_present(r, field)).unwrap_or(false))
                    .map(|s| s.as_str())
                    .collect();
                issues.push(format!("Missing required fields: {}", missing.join(", ")));
            }
            fraction
        }
        _ => match criteria.min_records {
            Some(min_records) if min_records > 0 => {
                let actual = payload::record_count(payload);
                (actual as f64 / min_records as f64).min(1.0)
            }
            _ => 1.0,
        },
    };

    let actual_count = payload::record_count(payload);
    let record_count_factor = match expected_count {
        Some(expected) if expected > 0 => {
            let factor = (actual_count as f64 / expected as f64).min(1.0);
            if actual_count < expected {
                issues.push(format!(
                    "Incomplete data: expected {} records, got {}",
                    expected, actual_count
                ));
            }
            factor
        }
        _ => 1.0,
    };

    let completeness = 0.6 * criterion_match + 0.4 * record_count_factor;
    (completeness.clamp(0.0, 1.0), issues)
}
