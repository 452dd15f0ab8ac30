//! Cell configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_TTL_SECS, MAX_TTL_SECS};
use crate::error::{LapseError, Result};

/// Configuration for an expiring cell.
///
/// The TTL is carried as signed fractional seconds so that configuration
/// sources (JSON, env, host frameworks) can express it naturally. Negative,
/// non-finite and oversized values are rejected by [`CellConfig::validate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellConfig {
    /// Seconds a stored value stays live after it is set
    pub expires_after_secs: f64,
}

impl CellConfig {
    /// Creates a config with the given TTL in seconds.
    pub fn from_secs(expires_after_secs: f64) -> Self {
        Self { expires_after_secs }
    }

    /// Checks that the TTL is a usable duration.
    pub fn validate(&self) -> Result<()> {
        let secs = self.expires_after_secs;
        if secs.is_nan() || secs.is_infinite() {
            return Err(LapseError::ConfigError(format!(
                "expires_after_secs must be finite, got {secs}"
            )));
        }
        if secs < 0.0 {
            return Err(LapseError::ConfigError(format!(
                "expires_after_secs must not be negative, got {secs}"
            )));
        }
        if secs > MAX_TTL_SECS as f64 {
            return Err(LapseError::ConfigError(format!(
                "expires_after_secs must be at most {MAX_TTL_SECS}, got {secs}"
            )));
        }
        Ok(())
    }

    /// Returns the validated TTL.
    pub fn ttl(&self) -> Result<Duration> {
        self.validate()?;
        Ok(Duration::from_secs_f64(self.expires_after_secs))
    }
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            expires_after_secs: DEFAULT_TTL_SECS as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn test_default_config() {
        let config = CellConfig::default();
        assert_eq!(config.ttl().unwrap(), Duration::from_secs(DEFAULT_TTL_SECS));
    }

    #[test_case(0.0, Duration::ZERO ; "zero ttl is legal")]
    #[test_case(0.5, Duration::from_millis(500) ; "fractional seconds")]
    #[test_case(5.0, Duration::from_secs(5) ; "whole seconds")]
    fn test_valid_ttl(secs: f64, expected: Duration) {
        assert_eq!(CellConfig::from_secs(secs).ttl().unwrap(), expected);
    }

    #[test_case(-1.0 ; "negative")]
    #[test_case(-0.001 ; "slightly negative")]
    #[test_case(f64::NAN ; "nan")]
    #[test_case(f64::INFINITY ; "infinite")]
    #[test_case(MAX_TTL_SECS as f64 + 1.0 ; "above max")]
    fn test_invalid_ttl(secs: f64) {
        let err = CellConfig::from_secs(secs).ttl().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_config_from_json() {
        let config: CellConfig = serde_json::from_str(r#"{"expires_after_secs": 5}"#).unwrap();
        assert_eq!(config.ttl().unwrap(), Duration::from_secs(5));

        // Missing field falls back to the default
        let config: CellConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CellConfig::default());
    }

    #[test]
    fn test_negative_config_from_json_is_rejected() {
        let config: CellConfig = serde_json::from_str(r#"{"expires_after_secs": -3}"#).unwrap();
        assert!(matches!(config.validate(), Err(LapseError::ConfigError(_))));
    }

    proptest! {
        #[test]
        fn prop_non_negative_in_range_is_valid(secs in 0.0f64..1_000_000.0) {
            prop_assert!(CellConfig::from_secs(secs).validate().is_ok());
        }

        #[test]
        fn prop_negative_is_rejected(secs in -1_000_000.0f64..-0.000_001) {
            prop_assert!(CellConfig::from_secs(secs).validate().is_err());
        }
    }
}
