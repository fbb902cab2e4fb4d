//! Desk configuration
//!
//! Loaded from TOML; every field is optional and falls back to its default.
//!
//! ```toml
//! page_size = 25
//! gate_policy = "reject"
//! history_limit = 100
//! log_filter = "lab_desk=debug,info"
//! ```

use std::path::Path;

use lab_confirm::GatePolicy;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Desk configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeskConfig {
    /// Rows per table page
    pub page_size: usize,
    /// Behaviour for overlapping confirmations
    pub gate_policy: GatePolicy,
    /// Undo steps kept; `0` disables undo
    pub history_limit: usize,
    /// Tracing filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl DeskConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With page size
    #[inline]
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// With gate policy
    #[inline]
    #[must_use]
    pub fn with_gate_policy(mut self, policy: GatePolicy) -> Self {
        self.gate_policy = policy;
        self
    }

    /// With history limit
    #[inline]
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// With log filter
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&input)?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "page_size",
                reason: "must be at least 1".into(),
            });
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "log_filter",
                reason: "must not be blank".into(),
            });
        }
        Ok(())
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            gate_policy: GatePolicy::Queue,
            history_limit: 50,
            log_filter: "info".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(DeskConfig::from_toml_str("").unwrap(), DeskConfig::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = DeskConfig::from_toml_str("page_size = 25\ngate_policy = \"reject\"").unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.gate_policy, GatePolicy::Reject);
        assert_eq!(config.history_limit, 50);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = DeskConfig::from_toml_str("page_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "page_size", .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            DeskConfig::from_toml_str("pagesize = 5"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn builders() {
        let config = DeskConfig::new()
            .with_page_size(5)
            .with_gate_policy(GatePolicy::Reject)
            .with_history_limit(0)
            .with_log_filter("debug");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.history_limit, 0);
        assert_eq!(config.log_filter, "debug");
        assert!(config.validate().is_ok());
    }
}
