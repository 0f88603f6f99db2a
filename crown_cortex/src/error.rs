//! Error types for the cortex crate.

use std::path::PathBuf;
use thiserror::Error;

/// Why a trigger condition could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("empty trigger condition")]
    Empty,

    #[error("no comparison operator in '{0}'")]
    MissingOperator(String),

    #[error("'{0}' is not a stat name")]
    InvalidStat(String),

    #[error("'{0}' is not an integer threshold")]
    InvalidThreshold(String),
}

/// Failures while loading scenario or vignette files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid scenario: {0}")]
    Rules(#[from] crown_rules::RulesError),
}
