//! Slashing State Machine (C8).
//!
//! Progressive penalties applied on each `slash` call, depending only on
//! the oracle's post-increment `slashed_count`. Timeouts use a distinct,
//! lighter penalty that never touches stake.

use crate::error::OracleError;

use super::registry::OracleRegistry;
use super::OracleStatus;

const SUSPENSION_DAYS: i64 = 30;

/// Result of a slashing call: amount of stake removed and whether this
/// offence banned the oracle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlashOutcome {
    pub slashed_amount: f64,
    pub banned: bool,
}

/// Apply the next progressive penalty to `pubkey` for `reason`.
pub fn slash(registry: &OracleRegistry, pubkey: &str, reason: &str) -> Result<SlashOutcome, OracleError> {
    registry.with_mut(pubkey, |oracle| {
        oracle.slashed_count += 1;

        let outcome = match oracle.slashed_count {
            1 => {
                oracle.reputation_score = oracle.reputation_score.saturating_sub(100);
                SlashOutcome {
                    slashed_amount: 0.0,
                    banned: false,
                }
            }
            2 => {
                let amount = oracle.stake * 0.10;
                oracle.stake -= amount;
                oracle.reputation_score = oracle.reputation_score.saturating_sub(200);
                SlashOutcome {
                    slashed_amount: amount,
                    banned: false,
                }
            }
            3 => {
                let amount = oracle.stake * 0.50;
                oracle.stake -= amount;
                oracle.status = OracleStatus::Suspended;
                oracle.suspension_expiry = Some(chrono::Utc::now() + chrono::Duration::days(SUSPENSION_DAYS));
                SlashOutcome {
                    slashed_amount: amount,
                    banned: false,
                }
            }
            _ => {
                let amount = oracle.stake;
                oracle.stake = 0.0;
                oracle.status = OracleStatus::Banned;
                SlashOutcome {
                    slashed_amount: amount,
                    banned: true,
                }
            }
        };

        tracing::warn!(pubkey, reason, offence = oracle.slashed_count, ?outcome, "oracle slashed");
        outcome
    })
}

/// Record a missed deadline: deducts reputation only, never touches stake.
pub fn record_timeout(registry: &OracleRegistry, pubkey: &str) -> Result<(), OracleError> {
    registry.with_mut(pubkey, |oracle| {
        oracle.reputation_score = oracle.reputation_score.saturating_sub(50);
        tracing::warn!(pubkey, reputation = oracle.reputation_score, "oracle timed out");
    })
}
