//! Runtime configuration and tunable constants.
//!
//! Defaults match the values enumerated in the design's external
//! interfaces section. `Config::from_env` follows the same
//! environment-override-with-safe-fallback pattern used for oracle node
//! configuration elsewhere in this codebase's lineage: read a variable,
//! fall back to the default on anything that doesn't parse.

use std::env;

/// Scoring weight table used by the assessor.
///
/// Exactly one of these is active for a given deployment; both schemes
/// from the source material must never coexist in the same call path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub semantic: f64,
    pub completeness: f64,
    pub freshness: f64,
    pub schema: f64,
}

impl ScoringWeights {
    /// No schema criterion supplied: 40% semantic / 40% completeness / 20% freshness.
    pub const NO_SCHEMA: Self = Self {
        semantic: 0.40,
        completeness: 0.40,
        freshness: 0.20,
        schema: 0.0,
    };

    /// Schema criterion supplied: 40% completeness / 30% freshness / 30% schema.
    pub const WITH_SCHEMA: Self = Self {
        semantic: 0.0,
        completeness: 0.40,
        freshness: 0.30,
        schema: 0.30,
    };
}

/// Oracle core configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Minimum stake (opaque unit) required to register an oracle.
    pub min_stake: f64,
    /// Minimum oracle count for consensus.
    pub min_oracles: usize,
    /// Maximum oracle count selectable at once.
    pub max_oracles: usize,
    /// Standard-deviation multiplier beyond which a score is an outlier.
    pub outlier_threshold: f64,
    /// Transaction value above which multi-oracle review is optional.
    pub threshold_optional_review: f64,
    /// Transaction value above which multi-oracle consensus is mandatory.
    pub threshold_mandatory_multi: f64,
    /// Reputation floor for the `admin_oracle` fallback strategy.
    pub admin_oracle_reputation: u32,
    /// Whether the process is running in production mode (refuses to
    /// start signing without a configured key).
    pub production: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_stake: 10.0,
            min_oracles: 3,
            max_oracles: 5,
            outlier_threshold: 1.5,
            threshold_optional_review: 0.1,
            threshold_mandatory_multi: 1.0,
            admin_oracle_reputation: 900,
            production: false,
        }
    }
}

impl Config {
    /// Load configuration, overriding defaults from environment
    /// variables where present and well-formed. Malformed values are
    /// logged and ignored rather than treated as fatal.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = parse_env("ORACLE_MIN_STAKE") {
            config.min_stake = v;
        }
        if let Some(v) = parse_env::<usize>("ORACLE_MIN_ORACLES") {
            config.min_oracles = v;
        }
        if let Some(v) = parse_env::<usize>("ORACLE_MAX_ORACLES") {
            config.max_oracles = v;
        }
        if let Some(v) = parse_env("ORACLE_OUTLIER_THRESHOLD") {
            config.outlier_threshold = v;
        }
        if let Some(v) = parse_env("ORACLE_THRESHOLD_OPTIONAL_REVIEW") {
            config.threshold_optional_review = v;
        }
        if let Some(v) = parse_env("ORACLE_THRESHOLD_MANDATORY_MULTI") {
            config.threshold_mandatory_multi = v;
        }
        if let Some(v) = parse_env::<u32>("ORACLE_ADMIN_REPUTATION") {
            config.admin_oracle_reputation = v;
        }
        config.production = env::var("ORACLE_PRODUCTION")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        config
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(key, raw, "ignoring malformed environment override");
                None
            }
        },
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = Config::default();
        assert_eq!(config.min_stake, 10.0);
        assert_eq!(config.min_oracles, 3);
        assert_eq!(config.max_oracles, 5);
        assert_eq!(config.outlier_threshold, 1.5);
        assert_eq!(config.admin_oracle_reputation, 900);
        assert!(!config.production);
    }

    #[test]
    fn weight_tables_sum_to_one() {
        let no_schema = ScoringWeights::NO_SCHEMA;
        assert!((no_schema.semantic + no_schema.completeness + no_schema.freshness - 1.0).abs() < 1e-9);

        let with_schema = ScoringWeights::WITH_SCHEMA;
        assert!(
            (with_schema.completeness + with_schema.freshness + with_schema.schema - 1.0).abs() < 1e-9
        );
    }
}
