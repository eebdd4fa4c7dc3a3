//! Quality Assessor (C2).
//!
//! Scores a data payload against a query and a set of criteria, producing
//! a `QualityAssessment` with a weighted `quality_score`, per-component
//! breakdown, human-readable issues, and the refund percentage the score
//! implies.
//!
//! `QualityCriteria.required_fields` is the structured, exact-field-name
//! form of "what must be present" in a payload. The verdict service's
//! wire contract only exposes a flat list of strings (`expected_criteria`)
//! for this; it is passed through unchanged as `required_fields` there,
//! so criterion strings act as field names to look up on the first
//! record. Callers that want min-record-count or schema criteria instead
//! construct `QualityCriteria` directly — this is a library-level
//! capability the single-verdict wire format does not currently expose.

mod completeness;
mod freshness;
mod schema;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ScoringWeights;
use crate::embedder::SemanticEmbedder;
use crate::payload;

/// What a payload is being checked against, beyond the semantic query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityCriteria {
    /// Minimum number of records expected, used for the criterion-match
    /// factor only when `required_fields` is not supplied.
    pub min_records: Option<usize>,
    /// Field names that must be present and non-empty on the first record.
    pub required_fields: Option<Vec<String>>,
    /// Maximum acceptable data age, in days.
    pub max_age_days: Option<f64>,
    /// Loose structural shape the payload should match.
    pub schema: Option<SchemaCriteria>,
}

/// A loose structural check: type of the payload root and/or a set of
/// top-level property names it should carry. Not a JSON Schema engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Number,
    Integer,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaCriteria {
    pub r#type: Option<SchemaType>,
    pub properties: Option<Vec<String>>,
}

/// Per-dimension scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityComponents {
    pub semantic: f64,
    pub completeness: f64,
    pub freshness: f64,
    pub schema: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// Weighted score, 0-100, rounded to two decimal places.
    pub quality_score: f64,
    pub components: QualityComponents,
    pub issues: Vec<String>,
    /// Integer refund percentage, per the release/partial/full curve.
    pub refund_percentage: u8,
}

/// Scores `payload` against `query` and `criteria`. `expected_count`, if
/// given, is the record count the requester was promised ahead of time.
pub fn assess<E: SemanticEmbedder>(
    embedder: &E,
    query: &str,
    payload: &Value,
    criteria: &QualityCriteria,
    expected_count: Option<usize>,
) -> QualityAssessment {
    let mut issues = Vec::new();

    let weights = if criteria.schema.is_some() {
        ScoringWeights::WITH_SCHEMA
    } else {
        ScoringWeights::NO_SCHEMA
    };

    let semantic = if weights.semantic > 0.0 {
        let rendered = payload::canonical_render(payload);
        embedder.similarity(query, &rendered) as f64
    } else {
        0.0
    };

    let (completeness, mut completeness_issues) = completeness::score(payload, criteria, expected_count);
    issues.append(&mut completeness_issues);

    let (freshness, mut freshness_issues) = freshness::score(payload, criteria);
    issues.append(&mut freshness_issues);

    let (schema_score, mut schema_issues) = schema::score(payload, criteria);
    issues.append(&mut schema_issues);

    let components = QualityComponents {
        semantic,
        completeness,
        freshness,
        schema: schema_score,
    };

    let weighted = weights.semantic * components.semantic
        + weights.completeness * components.completeness
        + weights.freshness * components.freshness
        + weights.schema * components.schema;

    let quality_score = (weighted * 100.0 * 100.0).round() / 100.0;
    let refund_percentage = refund_percentage_for(quality_score);

    QualityAssessment {
        quality_score,
        components,
        issues,
        refund_percentage,
    }
}

/// Refund percentage implied by a 0-100 quality score:
/// ≥80 release (0%), 50-79 partial (linear between 0% and 100%), <50 full (100%).
pub fn refund_percentage_for(quality_score: f64) -> u8 {
    if quality_score >= 80.0 {
        0
    } else if quality_score >= 50.0 {
        (((80.0 - quality_score) / 80.0) * 100.0).round() as u8
    } else {
        100
    }
}
