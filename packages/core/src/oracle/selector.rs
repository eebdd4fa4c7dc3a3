//! Oracle Selector (C6).
//!
//! Deterministic seeded selection from an active-oracle list: at each
//! step, hash `seed || nonce_be` and take the first four bytes as a
//! big-endian index modulo the list length, incrementing `nonce` whether
//! or not the candidate was already picked.

use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::error::OracleError;

use super::Oracle;

/// Select `count` distinct oracles from `active`, deterministically from
/// `seed`. `count` may not exceed `config.max_oracles`, the configured
/// ceiling on how large a review panel a caller may request.
pub fn select_oracles(active: &[Oracle], count: usize, seed: &[u8], config: &Config) -> Result<Vec<Oracle>, OracleError> {
    if count > config.max_oracles {
        return Err(OracleError::InvalidRequest(format!(
            "requested oracle count {count} exceeds configured maximum {}",
            config.max_oracles
        )));
    }
    if count > active.len() {
        return Err(OracleError::InsufficientOracles {
            requested: count,
            available: active.len(),
        });
    }
    if count == 0 || active.is_empty() {
        return Ok(Vec::new());
    }

    let mut selected_indices = Vec::with_capacity(count);
    let mut nonce: u32 = 0;

    while selected_indices.len() < count {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update(nonce.to_be_bytes());
        let digest = hasher.finalize();
        let index = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) as usize % active.len();

        if !selected_indices.contains(&index) {
            selected_indices.push(index);
        }
        nonce += 1;
    }

    Ok(selected_indices.into_iter().map(|i| active[i].clone()).collect())
}

/// Append a `"backup"` marker to a seed, for selecting a replacement oracle.
pub fn backup_seed(seed: &[u8]) -> Vec<u8> {
    let mut extended = seed.to_vec();
    extended.extend_from_slice(b"backup");
    extended
}
