//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::registry::{LendingRegistry, PersonId};

/// Log levels accepted in `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// People registered as borrowers at startup.
    #[serde(default)]
    pub people: Vec<PersonConfig>,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel {
                level: self.logging.level.clone(),
                expected: LOG_LEVELS.join(", "),
            });
        }

        let mut seen = HashSet::new();
        for person in &self.people {
            if !seen.insert(&person.id) {
                return Err(ConfigError::DuplicatePerson {
                    id: person.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Builds a registry with the configured people registered.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Registration`] if the registry refuses a person,
    /// which happens when an id is listed twice.
    pub fn build_registry(&self) -> Result<LendingRegistry, ConfigError> {
        let mut registry = LendingRegistry::new();
        for person in &self.people {
            registry
                .register_person(person.id.clone(), &person.name)
                .map_err(|source| ConfigError::Registration {
                    id: person.id.clone(),
                    source,
                })?;
        }
        Ok(registry)
    }
}

/// A borrower to register at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonConfig {
    /// Unique person identifier (must not be blank).
    pub id: PersonId,

    /// Display name.
    pub name: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
