//! Fallback Policy (C9).
//!
//! Engaged when oracles time out or disagree catastrophically and too
//! few usable assessments remain for ordinary consensus.

use crate::config::Config;
use crate::error::OracleError;

use super::registry::OracleRegistry;
use super::selector::{backup_seed, select_oracles};
use super::slashing::record_timeout;
use super::Oracle;

const REDUCED_SET_MIN: usize = 2;

/// The strategy chosen for a fallback situation, and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackStrategy {
    /// A single backup oracle was selected to replace a timed-out one.
    BackupOracle,
    /// Enough fresh oracles exist for a full new consensus set.
    NewOracleSet,
    /// Fewer than 3 but at least 2 fresh oracles are available.
    ReducedThreshold,
    /// No replacement set is possible; route to a high-reputation admin oracle.
    AdminOracle,
    /// Nothing usable is available; retry later with an interim refund.
    DelayedRetry { retry_hours: u32, interim_refund_pct: u8 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutcome {
    pub strategy: FallbackStrategy,
    pub oracles: Vec<Oracle>,
}

/// Handle a single oracle timing out: select one backup via C6 and
/// deduct reputation from the one that timed out.
pub fn handle_timeout(
    registry: &OracleRegistry,
    config: &Config,
    timed_out_pubkey: &str,
    seed: &[u8],
) -> Result<FallbackOutcome, OracleError> {
    record_timeout(registry, timed_out_pubkey)?;

    let active = registry.active_oracles();
    let replacement_seed = backup_seed(seed);
    let selected = select_oracles(&active, 1, &replacement_seed, config)?;

    Ok(FallbackOutcome {
        strategy: FallbackStrategy::BackupOracle,
        oracles: selected,
    })
}

/// Handle catastrophic disagreement or widespread failure: attempt a new
/// set sized to `config.min_oracles` (capped at `config.max_oracles` by
/// `select_oracles` itself), fall back to a reduced threshold, an admin
/// oracle, or a delayed retry, in that order.
pub fn handle_failure(registry: &OracleRegistry, config: &Config, seed: &[u8]) -> FallbackOutcome {
    let active = registry.active_oracles();

    if active.len() >= config.min_oracles {
        if let Ok(selected) = select_oracles(&active, config.min_oracles, seed, config) {
            return FallbackOutcome {
                strategy: FallbackStrategy::NewOracleSet,
                oracles: selected,
            };
        }
    }

    if active.len() >= REDUCED_SET_MIN {
        if let Ok(selected) = select_oracles(&active, active.len().min(config.max_oracles), seed, config) {
            return FallbackOutcome {
                strategy: FallbackStrategy::ReducedThreshold,
                oracles: selected,
            };
        }
    }

    if let Some(admin) = active
        .iter()
        .find(|o| o.reputation_score >= config.admin_oracle_reputation)
    {
        return FallbackOutcome {
            strategy: FallbackStrategy::AdminOracle,
            oracles: vec![admin.clone()],
        };
    }

    FallbackOutcome {
        strategy: FallbackStrategy::DelayedRetry {
            retry_hours: 24,
            interim_refund_pct: 50,
        },
        oracles: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(n: usize, config: &Config) -> OracleRegistry {
        let registry = OracleRegistry::new(config);
        for i in 0..n {
            registry.register(&format!("pk{i}"), 10.0).unwrap();
        }
        registry
    }

    #[test]
    fn timeout_selects_one_backup() {
        let config = Config::default();
        let registry = registry_with(3, &config);
        let outcome = handle_timeout(&registry, &config, "pk0", &[0u8; 32]).unwrap();
        assert_eq!(outcome.strategy, FallbackStrategy::BackupOracle);
        assert_eq!(outcome.oracles.len(), 1);
        assert_eq!(registry.get("pk0").unwrap().reputation_score, 450);
    }

    #[test]
    fn sufficient_active_oracles_yield_new_set() {
        let config = Config::default();
        let registry = registry_with(5, &config);
        let outcome = handle_failure(&registry, &config, &[1u8; 32]);
        assert_eq!(outcome.strategy, FallbackStrategy::NewOracleSet);
        assert_eq!(outcome.oracles.len(), 3);
    }

    #[test]
    fn two_active_oracles_yield_reduced_threshold() {
        let config = Config::default();
        let registry = registry_with(2, &config);
        let outcome = handle_failure(&registry, &config, &[1u8; 32]);
        assert_eq!(outcome.strategy, FallbackStrategy::ReducedThreshold);
        assert_eq!(outcome.oracles.len(), 2);
    }

    #[test]
    fn admin_oracle_used_when_no_set_possible() {
        let config = Config::default();
        let registry = registry_with(1, &config);
        registry
            .with_mut("pk0", |o| o.reputation_score = 950)
            .unwrap();
        let outcome = handle_failure(&registry, &config, &[1u8; 32]);
        assert_eq!(outcome.strategy, FallbackStrategy::AdminOracle);
        assert_eq!(outcome.oracles[0].pubkey, "pk0");
    }

    #[test]
    fn delayed_retry_when_nothing_available() {
        let config = Config::default();
        let registry = OracleRegistry::new(&config);
        let outcome = handle_failure(&registry, &config, &[1u8; 32]);
        assert_eq!(
            outcome.strategy,
            FallbackStrategy::DelayedRetry {
                retry_hours: 24,
                interim_refund_pct: 50
            }
        );
    }
}
