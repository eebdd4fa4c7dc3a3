//! Oracle Registry (C5).
//!
//! A mapping from public key to `Oracle`, mutated only through
//! registration and slashing. Single-writer/many-reader, backed by a
//! `std::sync::RwLock` since the core is synchronous and CPU-bound — no
//! async runtime is introduced for this.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::config::Config;
use crate::error::OracleError;

use super::Oracle;

pub struct OracleRegistry {
    oracles: RwLock<HashMap<String, Oracle>>,
    min_stake: f64,
}

impl OracleRegistry {
    pub fn new(config: &Config) -> Self {
        Self {
            oracles: RwLock::new(HashMap::new()),
            min_stake: config.min_stake,
        }
    }

    /// Register a new oracle. Rejects insufficient stake or a duplicate
    /// public key, leaving the registry untouched on failure.
    pub fn register(&self, pubkey: &str, stake: f64) -> Result<(), OracleError> {
        if stake < self.min_stake {
            return Err(OracleError::InvalidRequest(format!(
                "stake {stake} is below minimum {}",
                self.min_stake
            )));
        }

        let mut oracles = self.oracles.write().expect("registry lock poisoned");
        if oracles.contains_key(pubkey) {
            return Err(OracleError::InvalidRequest(format!("oracle {pubkey} already registered")));
        }

        oracles.insert(pubkey.to_string(), Oracle::new(pubkey.to_string(), stake));
        tracing::info!(pubkey, stake, "registered oracle");
        Ok(())
    }

    /// Oracles currently eligible for selection: `Active`, or `Suspended`
    /// with an elapsed `suspension_expiry`. Excludes `Banned` entries.
    pub fn active_oracles(&self) -> Vec<Oracle> {
        let now = chrono::Utc::now();
        let oracles = self.oracles.read().expect("registry lock poisoned");
        oracles.values().filter(|o| o.is_active(now)).cloned().collect()
    }

    /// Look up a single oracle by public key.
    pub fn get(&self, pubkey: &str) -> Option<Oracle> {
        self.oracles.read().expect("registry lock poisoned").get(pubkey).cloned()
    }

    /// Number of registered oracles, active or not.
    pub fn len(&self) -> usize {
        self.oracles.read().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply a mutation to a registered oracle under the write lock.
    /// Returns `UnknownOracle` if the key is not registered.
    pub(crate) fn with_mut<F, T>(&self, pubkey: &str, f: F) -> Result<T, OracleError>
    where
        F: FnOnce(&mut Oracle) -> T,
    {
        let mut oracles = self.oracles.write().expect("registry lock poisoned");
        let oracle = oracles
            .get_mut(pubkey)
            .ok_or_else(|| OracleError::UnknownOracle(pubkey.to_string()))?;
        Ok(f(oracle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> OracleRegistry {
        OracleRegistry::new(&Config::default())
    }

    #[test]
    fn register_accepts_stake_at_minimum() {
        let reg = registry();
        assert!(reg.register("pk1", 10.0).is_ok());
    }

    #[test]
    fn register_rejects_insufficient_stake() {
        let reg = registry();
        assert!(reg.register("pk1", 9.999).is_err());
    }

    #[test]
    fn register_rejects_duplicate_pubkey() {
        let reg = registry();
        reg.register("pk1", 10.0).unwrap();
        assert!(reg.register("pk1", 20.0).is_err());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn active_oracles_excludes_banned() {
        let reg = registry();
        reg.register("pk1", 10.0).unwrap();
        reg.with_mut("pk1", |o| o.status = super::super::OracleStatus::Banned).unwrap();
        assert!(reg.active_oracles().is_empty());
    }

    #[test]
    fn active_oracles_excludes_unexpired_suspension() {
        let reg = registry();
        reg.register("pk1", 10.0).unwrap();
        reg.with_mut("pk1", |o| {
            o.status = super::super::OracleStatus::Suspended;
            o.suspension_expiry = Some(chrono::Utc::now() + chrono::Duration::days(30));
        })
        .unwrap();
        assert!(reg.active_oracles().is_empty());
    }

    #[test]
    fn active_oracles_includes_expired_suspension() {
        let reg = registry();
        reg.register("pk1", 10.0).unwrap();
        reg.with_mut("pk1", |o| {
            o.status = super::super::OracleStatus::Suspended;
            o.suspension_expiry = Some(chrono::Utc::now() - chrono::Duration::days(1));
        })
        .unwrap();
        assert_eq!(reg.active_oracles().len(), 1);
    }
}
