//! Store configuration.
//!
//! Every setting has a default matching a local development MongoDB, and each
//! can be overridden from the environment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `ROSTERDB_MONGODB_URI` | `mongodb://localhost:27017/` (empty disables MongoDB) |
//! | `ROSTERDB_DATABASE` | `mergington_high` |
//! | `ROSTERDB_SERVER_SELECTION_TIMEOUT_MS` | `5000` |
//! | `ROSTERDB_SEED` | `true` |

use std::time::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MONGODB_URI_VAR: &str = "ROSTERDB_MONGODB_URI";
pub const DATABASE_VAR: &str = "ROSTERDB_DATABASE";
pub const SERVER_SELECTION_TIMEOUT_VAR: &str = "ROSTERDB_SERVER_SELECTION_TIMEOUT_MS";
pub const SEED_VAR: &str = "ROSTERDB_SEED";

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/";
pub const DEFAULT_DATABASE: &str = "mergington_high";
pub const DEFAULT_SERVER_SELECTION_TIMEOUT_MS: u64 = 5000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Where documents are stored and whether the store starts out seeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Connection string of the MongoDB server. `None` always selects the
    /// in-memory store.
    pub mongodb_uri: Option<String>,
    pub database: String,
    pub server_selection_timeout_ms: u64,
    /// Seed empty collections with the initial activities and accounts.
    pub seed: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mongodb_uri: Some(DEFAULT_MONGODB_URI.to_string()),
            database: DEFAULT_DATABASE.to_string(),
            server_selection_timeout_ms: DEFAULT_SERVER_SELECTION_TIMEOUT_MS,
            seed: true,
        }
    }
}

impl StoreConfig {
    /// A configuration that never tries to reach MongoDB.
    pub fn in_memory() -> Self {
        Self {
            mongodb_uri: None,
            ..Self::default()
        }
    }

    pub fn with_mongodb_uri(mut self, uri: impl Into<String>) -> Self {
        self.mongodb_uri = Some(uri.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_seed(mut self, seed: bool) -> Self {
        self.seed = seed;
        self
    }

    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_millis(self.server_selection_timeout_ms)
    }

    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`, falling back to the defaults for
    /// variables it does not know.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(uri) = lookup(MONGODB_URI_VAR) {
            config.mongodb_uri = Some(uri).filter(|uri| !uri.trim().is_empty());
        }
        if let Some(database) = lookup(DATABASE_VAR) {
            config.database = database;
        }
        if let Some(timeout) = lookup(SERVER_SELECTION_TIMEOUT_VAR) {
            config.server_selection_timeout_ms = timeout
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid(SERVER_SELECTION_TIMEOUT_VAR, &timeout, e.to_string()))?;
        }
        if let Some(seed) = lookup(SEED_VAR) {
            config.seed = match seed.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(invalid(SEED_VAR, &seed, "expected a boolean".to_string())),
            };
        }

        Ok(config)
    }
}

fn invalid(key: &str, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();

        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.mongodb_uri.as_deref(), Some("mongodb://localhost:27017/"));
        assert_eq!(config.database, "mergington_high");
        assert_eq!(config.server_selection_timeout(), Duration::from_secs(5));
        assert!(config.seed);
    }

    #[test]
    fn overrides() {
        let config = StoreConfig::from_lookup(lookup(&[
            (MONGODB_URI_VAR, "mongodb://db.internal:27017/"),
            (DATABASE_VAR, "activities_test"),
            (SERVER_SELECTION_TIMEOUT_VAR, "250"),
            (SEED_VAR, "off"),
        ])).unwrap();

        assert_eq!(
            config,
            StoreConfig::default()
                .with_mongodb_uri("mongodb://db.internal:27017/")
                .with_database("activities_test")
                .with_server_selection_timeout(Duration::from_millis(250))
                .with_seed(false),
        );
    }

    #[test]
    fn empty_uri_disables_mongodb() {
        let config = StoreConfig::from_lookup(lookup(&[(MONGODB_URI_VAR, "  ")])).unwrap();

        assert_eq!(config.mongodb_uri, None);
        assert_eq!(config, StoreConfig::in_memory());
    }

    #[test]
    fn rejects_malformed_values() {
        let timeout = StoreConfig::from_lookup(lookup(&[(SERVER_SELECTION_TIMEOUT_VAR, "soon")]));
        assert!(matches!(timeout, Err(ConfigError::InvalidValue { key, .. }) if key == SERVER_SELECTION_TIMEOUT_VAR));

        let seed = StoreConfig::from_lookup(lookup(&[(SEED_VAR, "maybe")]));
        assert!(matches!(seed, Err(ConfigError::InvalidValue { key, .. }) if key == SEED_VAR));
    }

    #[test]
    fn deserializes_partial_json() {
        let config: StoreConfig = serde_json::from_str(r#"{ "mongodb_uri": null, "seed": false }"#).unwrap();

        assert_eq!(config, StoreConfig::in_memory().with_seed(false));
    }
}
