//! Multi-oracle consensus engine (C5-C9): registry, selection, consensus
//! aggregation, slashing, and fallback policy for high-value disputes.

pub mod consensus;
pub mod fallback;
pub mod registry;
pub mod selector;
pub mod slashing;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::OracleError;
use crate::fees::{self, FeeSplit};

pub use consensus::{calculate_consensus, detect_collusion, requires_multi_oracle, ConsensusResult};
pub use fallback::{FallbackOutcome, FallbackStrategy};
pub use registry::OracleRegistry;
pub use selector::select_oracles;
pub use slashing::{slash, SlashOutcome};

/// Lifecycle state of a registered oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleStatus {
    Active,
    Suspended,
    Banned,
}

/// A registered, staked oracle identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Oracle {
    pub pubkey: String,
    pub stake: f64,
    pub total_assessments: u64,
    pub slashed_count: u32,
    pub reputation_score: u32,
    pub status: OracleStatus,
    pub suspension_expiry: Option<chrono::DateTime<chrono::Utc>>,
}

impl Oracle {
    pub fn new(pubkey: String, stake: f64) -> Self {
        Self {
            pubkey,
            stake,
            total_assessments: 0,
            slashed_count: 0,
            reputation_score: 500,
            status: OracleStatus::Active,
            suspension_expiry: None,
        }
    }

    /// Whether this oracle currently counts as active: `Active`, or a
    /// `Suspended` oracle whose suspension has elapsed.
    pub fn is_active(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        match self.status {
            OracleStatus::Active => true,
            OracleStatus::Suspended => self.suspension_expiry.map(|expiry| now >= expiry).unwrap_or(false),
            OracleStatus::Banned => false,
        }
    }
}

/// A single oracle's signed score contribution to a consensus round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleAssessment {
    pub oracle_pubkey: String,
    pub quality_score: u8,
    pub reasoning: String,
    pub signature: String,
    pub timestamp: i64,
}

/// Consensus request (§6): the multi-oracle channel's single boundary
/// operation, mirroring `verdict::verify_quality` for the single-oracle
/// channel. Aggregates `assessments`, slashes every oracle flagged as an
/// outlier or as colluding against `registry`, and computes the fee
/// split owed for `transaction_value`.
pub fn consensus_request(
    registry: &OracleRegistry,
    config: &Config,
    transaction_id: &str,
    transaction_value: f64,
    assessments: Vec<OracleAssessment>,
) -> Result<(ConsensusResult, FeeSplit, Vec<SlashOutcome>), OracleError> {
    let oracle_count = assessments.len();
    let result = calculate_consensus(assessments, config)?;

    let mut flagged = result.outlier_indices.clone();
    for idx in detect_collusion(&result.assessments) {
        if !flagged.contains(&idx) {
            flagged.push(idx);
        }
    }
    flagged.sort_unstable();

    let mut slashes = Vec::with_capacity(flagged.len());
    for idx in flagged {
        let pubkey = result.assessments[idx].oracle_pubkey.clone();
        let reason = if result.outlier_indices.contains(&idx) {
            "outlier"
        } else {
            "collusion"
        };
        slashes.push(slash(registry, &pubkey, reason)?);
    }

    let fee_split = fees::calculate_fee_split(transaction_value, oracle_count);

    tracing::info!(
        transaction_id,
        transaction_value,
        oracle_count,
        slashed = slashes.len(),
        confidence = result.confidence,
        "consensus request resolved"
    );

    Ok((result, fee_split, slashes))
}

#[cfg(test)]
mod consensus_request_tests {
    use super::*;

    fn registry_with(n: usize, config: &Config) -> OracleRegistry {
        let registry = OracleRegistry::new(config);
        for i in 0..n {
            registry.register(&format!("pk{i}"), 10.0).unwrap();
        }
        registry
    }

    fn assessment(pubkey: &str, score: u8) -> OracleAssessment {
        OracleAssessment {
            oracle_pubkey: pubkey.to_string(),
            quality_score: score,
            reasoning: String::new(),
            signature: String::new(),
            timestamp: 0,
        }
    }

    #[test]
    fn consensus_request_slashes_outlier_and_returns_fee_split() {
        let config = Config::default();
        let registry = registry_with(5, &config);
        let assessments = vec![
            assessment("pk0", 70),
            assessment("pk1", 71),
            assessment("pk2", 73),
            assessment("pk3", 69),
            assessment("pk4", 5),
        ];

        let (result, fee_split, slashes) =
            consensus_request(&registry, &config, "tx-1", 1000.0, assessments).unwrap();

        assert_eq!(result.outlier_indices, vec![4]);
        assert_eq!(slashes.len(), 1);
        assert_eq!(registry.get("pk4").unwrap().slashed_count, 1);
        assert_eq!(registry.get("pk0").unwrap().slashed_count, 0);
        assert!((fee_split.primary - 0.01 * 0.60).abs() < 1e-9);
    }

    #[test]
    fn consensus_request_with_no_disagreement_slashes_nobody() {
        let config = Config::default();
        let registry = registry_with(3, &config);
        let assessments = vec![assessment("pk0", 78), assessment("pk1", 80), assessment("pk2", 82)];

        let (_, _, slashes) = consensus_request(&registry, &config, "tx-2", 1000.0, assessments).unwrap();
        assert!(slashes.is_empty());
    }

    #[test]
    fn consensus_request_propagates_too_few_assessments() {
        let config = Config::default();
        let registry = registry_with(3, &config);
        let assessments = vec![assessment("pk0", 80), assessment("pk1", 80)];

        let result = consensus_request(&registry, &config, "tx-3", 1000.0, assessments);
        assert!(matches!(result, Err(OracleError::TooFewAssessments { .. })));
    }
}
