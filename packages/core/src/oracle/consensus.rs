//! Consensus Aggregator (C7).
//!
//! Combines `>= config.min_oracles` assessments into a median-based
//! consensus with outlier detection and a confidence bucket derived from
//! sample standard deviation.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::OracleError;

use super::OracleAssessment;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub median_score: i64,
    pub mean_score: f64,
    pub std_dev: f64,
    pub confidence: u8,
    pub outlier_indices: Vec<usize>,
    pub assessments: Vec<OracleAssessment>,
}

/// Routes a transaction to single- or multi-oracle review (§6 "Consensus
/// request" boundary, §8's mandatory-multi threshold). Direct port of
/// the original source's `requires_multi_oracle`: at or above
/// `threshold_mandatory_multi`, multi-oracle consensus is required with
/// `config.min_oracles` reviewers; below it, single-oracle review
/// suffices whether or not the transaction has crossed
/// `threshold_optional_review`.
pub fn requires_multi_oracle(transaction_value: f64, config: &Config) -> (bool, usize) {
    if transaction_value >= config.threshold_mandatory_multi {
        (true, config.min_oracles)
    } else {
        (false, 1)
    }
}

/// Aggregate `assessments` into a `ConsensusResult`. Requires at least
/// `config.min_oracles` assessments.
pub fn calculate_consensus(assessments: Vec<OracleAssessment>, config: &Config) -> Result<ConsensusResult, OracleError> {
    if assessments.len() < config.min_oracles {
        return Err(OracleError::TooFewAssessments {
            min: config.min_oracles,
            got: assessments.len(),
        });
    }

    let scores: Vec<i64> = assessments.iter().map(|a| a.quality_score as i64).collect();
    let median_score = median(&scores);
    let mean_score = scores.iter().sum::<i64>() as f64 / scores.len() as f64;
    let std_dev = sample_std_dev(&scores, mean_score);

    let outlier_indices = if std_dev == 0.0 {
        Vec::new()
    } else {
        scores
            .iter()
            .enumerate()
            .filter(|(_, &s)| (s as f64 - mean_score).abs() > config.outlier_threshold * std_dev)
            .map(|(i, _)| i)
            .collect()
    };

    let confidence = confidence_for(std_dev);

    Ok(ConsensusResult {
        median_score,
        mean_score,
        std_dev,
        confidence,
        outlier_indices,
        assessments,
    })
}

/// Median with even-length ties broken toward the lower of the two
/// middle elements, so the result is always an existing integer score.
fn median(scores: &[i64]) -> i64 {
    let mut sorted = scores.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        sorted[n / 2 - 1]
    }
}

/// Sample standard deviation (Bessel's correction), 0 for n < 2.
fn sample_std_dev(scores: &[i64], mean: f64) -> f64 {
    let n = scores.len();
    if n < 2 {
        return 0.0;
    }
    let variance = scores.iter().map(|&s| (s as f64 - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}

fn confidence_for(std_dev: f64) -> u8 {
    if std_dev < 5.0 {
        100
    } else if std_dev < 10.0 {
        90
    } else if std_dev < 15.0 {
        75
    } else if std_dev < 20.0 {
        60
    } else {
        40
    }
}

/// Heuristic collusion flags, invoked by the caller before slashing.
/// Returns the indices of assessments considered suspicious.
pub fn detect_collusion(assessments: &[OracleAssessment]) -> Vec<usize> {
    let scores: Vec<i64> = assessments.iter().map(|a| a.quality_score as i64).collect();
    if scores.is_empty() {
        return Vec::new();
    }

    let all_identical = scores.iter().all(|&s| s == scores[0]);
    if all_identical {
        return (0..scores.len()).collect();
    }

    let mean = scores.iter().sum::<i64>() as f64 / scores.len() as f64;
    let std_dev = sample_std_dev(&scores, mean);
    if std_dev < 2.0 {
        return (0..scores.len()).collect();
    }

    let mut flagged = Vec::new();
    for i in 0..scores.len() {
        for j in (i + 1)..scores.len() {
            if scores[i] == scores[j] {
                let others_diverge = scores
                    .iter()
                    .enumerate()
                    .filter(|&(k, _)| k != i && k != j)
                    .any(|(_, &s)| (s - scores[i]).abs() >= 10);
                if others_diverge {
                    flagged.push(i);
                    flagged.push(j);
                }
            }
        }
    }
    flagged.sort_unstable();
    flagged.dedup();
    flagged
}
