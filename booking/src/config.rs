//! Configuration management for the booking service.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::catalog::{Catalog, CatalogError};
use crate::seed;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Path to a JSON catalog
pub const CATALOG_VAR: &str = "TABLEWISE_CATALOG";
/// Party size the wizard starts with
pub const DEFAULT_PARTY_VAR: &str = "TABLEWISE_DEFAULT_PARTY";
/// Largest party accepted
pub const MAX_PARTY_VAR: &str = "TABLEWISE_MAX_PARTY";
/// Store feedback-loop limit
pub const MAX_FEEDBACK_VAR: &str = "TABLEWISE_MAX_FEEDBACK";
/// Log filter
pub const LOG_VAR: &str = "RUST_LOG";

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "tablewise_booking=info,tablewise_runtime=info";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable holds a value that does not parse
    #[error("{var}={value:?} is not a valid {expected}")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// What the value should be
        expected: &'static str,
    },

    /// Values parse but contradict each other
    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// JSON catalog to load; the built-in reference catalog when unset
    pub catalog_path: Option<PathBuf>,
    /// Party size the wizard starts with
    pub default_party_size: u32,
    /// Largest party the restaurant step accepts
    pub max_party_size: u32,
    /// Feedback actions the store drains per command before giving up
    pub max_feedback_actions: usize,
    /// `tracing` filter directive
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            default_party_size: 2,
            max_party_size: 20,
            max_feedback_actions: 64,
            log_level: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse or the party
    /// sizes are inconsistent.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from the process environment, falling back to
    /// the defaults when it is invalid
    #[must_use]
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|error| {
            tracing::warn!(%error, "invalid configuration, using defaults");
            Self::default()
        })
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Same as [`Config::try_from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            catalog_path: lookup(CATALOG_VAR).filter(|path| !path.trim().is_empty()).map(PathBuf::from),
            default_party_size: parse(&lookup, DEFAULT_PARTY_VAR, "party size")?
                .unwrap_or(defaults.default_party_size),
            max_party_size: parse(&lookup, MAX_PARTY_VAR, "party size")?.unwrap_or(defaults.max_party_size),
            max_feedback_actions: parse(&lookup, MAX_FEEDBACK_VAR, "action count")?
                .unwrap_or(defaults.max_feedback_actions),
            log_level: lookup(LOG_VAR).unwrap_or(defaults.log_level),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_party_size == 0 {
            return Err(ConfigError::Validation("max party size must be at least 1".to_string()));
        }
        if self.default_party_size == 0 || self.default_party_size > self.max_party_size {
            return Err(ConfigError::Validation(format!(
                "default party size {} is outside 1..={}",
                self.default_party_size, self.max_party_size
            )));
        }
        Ok(())
    }

    /// The configured catalog, or the reference catalog dated from `today`
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be read or is invalid.
    pub fn load_catalog(&self, today: NaiveDate) -> Result<Catalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading catalog");
                Catalog::from_path(path)
            },
            None => seed::reference_catalog(today),
        }
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(var)
        .map(|value| {
            value.trim().parse().map_err(|_| ConfigError::Invalid {
                var,
                value,
                expected,
            })
        })
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        assert_eq!(Config::from_lookup(lookup(&[])).unwrap(), Config::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = Config::from_lookup(lookup(&[
            (CATALOG_VAR, "/etc/tablewise/catalog.json"),
            (DEFAULT_PARTY_VAR, "4"),
            (MAX_PARTY_VAR, " 12 "),
            (MAX_FEEDBACK_VAR, "8"),
            (LOG_VAR, "debug"),
        ]))
        .unwrap();

        assert_eq!(config.catalog_path, Some(PathBuf::from("/etc/tablewise/catalog.json")));
        assert_eq!(config.default_party_size, 4);
        assert_eq!(config.max_party_size, 12);
        assert_eq!(config.max_feedback_actions, 8);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn malformed_numbers_are_errors() {
        let error = Config::from_lookup(lookup(&[(MAX_PARTY_VAR, "lots")])).unwrap_err();
        assert_eq!(
            error,
            ConfigError::Invalid {
                var: MAX_PARTY_VAR,
                value: "lots".to_string(),
                expected: "party size"
            }
        );
    }

    #[test]
    fn default_party_must_fit_the_maximum() {
        let error = Config::from_lookup(lookup(&[(DEFAULT_PARTY_VAR, "30")])).unwrap_err();
        assert!(matches!(error, ConfigError::Validation(_)));
    }

    #[test]
    fn reference_catalog_is_used_without_a_path() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let catalog = Config::default().load_catalog(today).unwrap();
        assert_eq!(catalog.addons().len(), 20);
    }
}
