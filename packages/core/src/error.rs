//! Error kinds shared across the oracle core.
//!
//! Mirrors the error taxonomy from the design: request-level errors
//! propagate to the caller, internal scoring anomalies are absorbed into
//! the assessment instead (see `assessor`).

use thiserror::Error;

/// Errors surfaced by the oracle core.
///
/// `EmbeddingFailure` is intentionally never constructed outside of
/// `embedder` internals and is never propagated past `assess` — it is
/// absorbed into the assessment's issue list, per the design's
/// propagation policy.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("insufficient active oracles: requested {requested}, have {available}")]
    InsufficientOracles { requested: usize, available: usize },

    #[error("consensus requires at least {min} assessments, got {got}")]
    TooFewAssessments { min: usize, got: usize },

    #[error("unknown oracle: {0}")]
    UnknownOracle(String),

    #[error("signing key unavailable")]
    KeyUnavailable,

    #[error("embedding failure: {0}")]
    EmbeddingFailure(String),

    #[error("request timed out")]
    Timeout,
}
