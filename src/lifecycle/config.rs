//! # Configuration
//!
//! [`SystemConfig`] collects the operator-tunable settings. Every field has a default,
//! so a config file only needs the keys it changes:
//!
//! ```json
//! { "vat_rate": "0.22", "capacity_policy": "enforce" }
//! ```

use crate::order_actor::{CapacityPolicy, TransitionPolicy};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// VAT added on invoice subtotals.
    pub vat_rate: Decimal,
    /// Orders from the same phone to the same ring and stop within this many hours are
    /// flagged as possible duplicates.
    pub duplicate_window_hours: u32,
    pub capacity_policy: CapacityPolicy,
    pub transition_policy: TransitionPolicy,
    /// Request channel capacity of every actor.
    pub channel_buffer: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            vat_rate: dec!(0.20),
            duplicate_window_hours: 24,
            capacity_policy: CapacityPolicy::Advisory,
            transition_policy: TransitionPolicy::Permissive,
            channel_buffer: 32,
        }
    }
}

impl SystemConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vat_rate.is_sign_negative() || self.vat_rate >= Decimal::ONE {
            return Err(ConfigError::Invalid(format!(
                "vat_rate {} must be in [0, 1)",
                self.vat_rate
            )));
        }
        if self.channel_buffer == 0 {
            return Err(ConfigError::Invalid("channel_buffer must be positive".into()));
        }
        Ok(())
    }

    pub fn duplicate_window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.duplicate_window_hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_means_defaults() {
        assert_eq!(SystemConfig::from_json("{}").unwrap(), SystemConfig::default());
    }

    #[test]
    fn partial_override() {
        let config =
            SystemConfig::from_json(r#"{"vat_rate":"0.22","capacity_policy":"enforce","transition_policy":"strict"}"#)
                .unwrap();
        assert_eq!(config.vat_rate, dec!(0.22));
        assert_eq!(config.capacity_policy, CapacityPolicy::Enforce);
        assert_eq!(config.transition_policy, TransitionPolicy::Strict);
        assert_eq!(config.duplicate_window_hours, 24);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(SystemConfig::from_json(r#"{"vat_rate":"1.5"}"#).is_err());
        assert!(SystemConfig::from_json(r#"{"channel_buffer":0}"#).is_err());
        assert!(SystemConfig::from_json(r#"{"vat":"0.2"}"#).is_err());
    }
}
