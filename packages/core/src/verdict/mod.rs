//! Verdict Service (C4).
//!
//! Wraps the assessor and signer in a request/response protocol: validate
//! the request, score it, sign the integer score, and return a verdict.
//! Internal scoring anomalies never fail the request — they collapse to
//! a zero-score, full-refund verdict that is still correctly signed, so
//! callers only ever distinguish outcomes by `recommendation`.

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::assessor::{self, QualityAssessment, QualityCriteria};
use crate::embedder::SemanticEmbedder;
use crate::error::OracleError;
use crate::signer::VerdictSigner;

const MAX_TRANSACTION_ID_BYTES: usize = 64;

/// A request for a single-oracle quality verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub original_query: String,
    pub data_received: Value,
    pub expected_criteria: Vec<String>,
    pub transaction_id: String,
    pub expected_record_count: Option<usize>,
}

/// Closed set of settlement recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Release,
    PartialRefund,
    FullRefund,
}

impl Recommendation {
    fn from_quality_score(quality_score: f64) -> Self {
        if quality_score >= 80.0 {
            Recommendation::Release
        } else if quality_score >= 50.0 {
            Recommendation::PartialRefund
        } else {
            Recommendation::FullRefund
        }
    }
}

/// Signed response returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub quality_score: f64,
    pub recommendation: Recommendation,
    pub refund_percentage: u8,
    pub reasoning: String,
    pub signature: String,
}

/// Run a single-oracle verdict for `request` using `embedder` for semantic
/// scoring and `signer` to sign the resulting integer score.
pub fn verify_quality<E: SemanticEmbedder>(
    embedder: &E,
    signer: &VerdictSigner,
    request: &VerificationRequest,
) -> Result<VerificationResponse, OracleError> {
    validate(request)?;

    let criteria = QualityCriteria {
        min_records: None,
        required_fields: if request.expected_criteria.is_empty() {
            None
        } else {
            Some(request.expected_criteria.clone())
        },
        max_age_days: None,
        schema: None,
    };

    let assessment = catch_unwind(AssertUnwindSafe(|| {
        assessor::assess(
            embedder,
            &request.original_query,
            &request.data_received,
            &criteria,
            request.expected_record_count,
        )
    }))
    .unwrap_or_else(|_| {
        tracing::error!(transaction_id = %request.transaction_id, "scoring panicked, falling back to full refund");
        fallback_assessment()
    });

    Ok(build_response(signer, &request.transaction_id, &assessment))
}

fn validate(request: &VerificationRequest) -> Result<(), OracleError> {
    if request.transaction_id.is_empty() {
        return Err(OracleError::InvalidRequest("transaction_id must not be empty".into()));
    }
    if request.transaction_id.len() > MAX_TRANSACTION_ID_BYTES {
        return Err(OracleError::InvalidRequest(format!(
            "transaction_id exceeds {MAX_TRANSACTION_ID_BYTES} bytes"
        )));
    }
    if request.original_query.is_empty() {
        return Err(OracleError::InvalidRequest("original_query must not be empty".into()));
    }
    Ok(())
}

fn fallback_assessment() -> QualityAssessment {
    QualityAssessment {
        quality_score: 0.0,
        components: assessor::QualityComponents {
            semantic: 0.0,
            completeness: 0.0,
            freshness: 0.0,
            schema: 0.0,
        },
        issues: vec!["internal scoring error".to_string()],
        refund_percentage: 100,
    }
}

fn build_response(signer: &VerdictSigner, transaction_id: &str, assessment: &QualityAssessment) -> VerificationResponse {
    let integer_score = assessment.quality_score.floor().clamp(0.0, 255.0) as u8;
    let signature = signer.sign(transaction_id, integer_score);
    let reasoning = format!(
        "semantic={:.2} completeness={:.2} freshness={:.2} schema={:.2}",
        assessment.components.semantic,
        assessment.components.completeness,
        assessment.components.freshness,
        assessment.components.schema
    );

    VerificationResponse {
        quality_score: assessment.quality_score,
        recommendation: Recommendation::from_quality_score(assessment.quality_score),
        refund_percentage: assessment.refund_percentage,
        reasoning,
        signature,
    }
}
