//! Schema component (§4.2): loose structural validation against the raw
//! payload shape, not a strict JSON Schema implementation.

use serde_json::Value;

use super::{QualityCriteria, SchemaType};

pub fn score(payload: &Value, criteria: &QualityCriteria) -> (f64, Vec<String>) {
    let schema = match &criteria.schema {
        Some(schema) => schema,
        None => return (1.0, Vec::new()),
    };

    let mut score = 1.0f64;
    let mut issues = Vec::new();

    if let Some(expected_type) = schema.r#type {
        if !matches_type(payload, expected_type) {
            score -= 0.5;
            issues.push(format!(
                "Payload type does not match expected schema type {:?}",
                expected_type
            ));
        }
    }

    if let Some(properties) = &schema.properties {
        if !properties.is_empty() {
            let missing: Vec<&str> = properties
                .iter()
                .filter(|p| payload.get(p.as_str()).is_none())
                .map(|s| s.as_str())
                .collect();
            if !missing.is_empty() {
                let penalty = 0.5 * (missing.len() as f64 / properties.len() as f64);
                score -= penalty;
                issues.push(format!("Missing schema properties: {}", missing.join(", ")));
            }
        }
    }

    (score.clamp(0.0, 1.0), issues)
}

fn matches_type(value: &Value, expected: SchemaType) -> bool {
    match expected {
        SchemaType::Object => value.is_object(),
        SchemaType::Array => value.is_array(),
        SchemaType::String => value.is_string(),
        SchemaType::Number => value.is_number(),
        SchemaType::Integer => value.is_i64() || value.is_u64(),
        SchemaType::Boolean => value.is_boolean(),
    }
}
