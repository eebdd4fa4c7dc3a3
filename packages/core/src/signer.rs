//! Verdict Signer (C3).
//!
//! Signs the canonical `"{transaction_id}:{quality_score}"` message with
//! Ed25519 and exposes the corresponding public key, hex-encoded, the
//! same way the rest of this codebase's lineage hands out verification
//! keys for signature checking downstream.

use std::env;

use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use rand::rngs::OsRng;

use crate::error::OracleError;

const KEY_ENV_VAR: &str = "ORACLE_SIGNING_KEY";

/// Ed25519 keypair used to sign quality verdicts.
pub struct VerdictSigner {
    signing_key: SigningKey,
}

impl VerdictSigner {
    /// Load the signing key from `ORACLE_SIGNING_KEY` (64 hex characters,
    /// a 32-byte seed). In production mode, a missing or malformed key is
    /// fatal; outside production, a fresh key is generated so local
    /// development and tests never need one configured.
    pub fn from_env(production: bool) -> Result<Self, OracleError> {
        match env::var(KEY_ENV_VAR) {
            Ok(raw) => Self::from_hex_seed(&raw),
            Err(_) if production => {
                tracing::error!("refusing to start in production without {}", KEY_ENV_VAR);
                Err(OracleError::KeyUnavailable)
            }
            Err(_) => {
                tracing::warn!("{} not set, generating an ephemeral signing key", KEY_ENV_VAR);
                Ok(Self::generate())
            }
        }
    }

    /// Parse a 32-byte Ed25519 seed from a 64-character hex string.
    pub fn from_hex_seed(hex_seed: &str) -> Result<Self, OracleError> {
        let bytes = hex::decode(hex_seed).map_err(|e| {
            tracing::error!(error = %e, "invalid hex signing seed");
            OracleError::KeyUnavailable
        })?;
        let seed: [u8; 32] = bytes.try_into().map_err(|_| {
            tracing::error!("signing seed must be exactly 32 bytes");
            OracleError::KeyUnavailable
        })?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// Generate a fresh, random signing key. Used for local development
    /// and tests, never for a production deployment.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Sign a verdict over `transaction_id` and an integer `quality_score`.
    /// The message format is `"{transaction_id}:{quality_score}"`, matching
    /// the wire format verified on the settlement side.
    pub fn sign(&self, transaction_id: &str, quality_score: u8) -> String {
        let message = canonical_message(transaction_id, quality_score);
        let signature: Signature = self.signing_key.sign(message.as_bytes());
        hex::encode(signature.to_bytes())
    }

    /// Hex-encoded Ed25519 public key, for downstream signature checks.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    /// Algorithm identifier exposed alongside the public key.
    pub fn algorithm(&self) -> &'static str {
        "ed25519"
    }
}

/// Build the canonical signing message for a transaction/score pair.
pub fn canonical_message(transaction_id: &str, quality_score: u8) -> String {
    format!("{transaction_id}:{quality_score}")
}

/// Verify a hex-encoded signature against a hex-encoded public key.
pub fn verify(public_key_hex: &str, transaction_id: &str, quality_score: u8, signature_hex: &str) -> bool {
    let Ok(pk_bytes) = hex::decode(public_key_hex) else {
        return false;
    };
    let Ok(pk_bytes): Result<[u8; 32], _> = pk_bytes.try_into() else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(&pk_bytes) else {
        return false;
    };

    let Ok(sig_bytes) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(sig_bytes): Result<[u8; 64], _> = sig_bytes.try_into() else {
        return false;
    };
    let signature = Signature::from_bytes(&sig_bytes);

    let message = canonical_message(transaction_id, quality_score);
    verifying_key.verify(message.as_bytes(), &signature).is_ok()
}
