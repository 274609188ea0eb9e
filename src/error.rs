//! Error types for library-lending-mcp.
//!
//! Lending failures live in [`crate::registry::LendingError`]; this module
//! holds the errors that can stop the server from starting.

use std::path::PathBuf;

use thiserror::Error;

use crate::registry::{LendingError, PersonId};

/// Errors raised while loading the lending configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly given configuration path does not exist.
    #[error("lending configuration not found at {path}")]
    NotFound {
        /// Path given on the command line.
        path: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("failed to read lending configuration {path}: {source}")]
    Unreadable {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON or has unknown fields.
    #[error("malformed lending configuration {path}: {source}")]
    Malformed {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// `logging.level` is not a known level.
    #[error("invalid log level '{level}' in lending configuration (expected one of: {expected})")]
    InvalidLogLevel {
        /// The level as written.
        level: String,
        /// Comma-separated accepted levels.
        expected: String,
    },

    /// The same person id appears twice in `people`.
    #[error("duplicate person id '{id}' in lending configuration")]
    DuplicatePerson {
        /// The repeated id.
        id: PersonId,
    },

    /// A configured person could not be registered.
    #[error("cannot register configured person '{id}': {source}")]
    Registration {
        /// The person's id.
        id: PersonId,
        /// Why the registry refused it.
        #[source]
        source: LendingError,
    },
}
