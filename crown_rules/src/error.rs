//! Error types for the rules crate.

use thiserror::Error;

/// Failures raised by the hard system.
///
/// Lookups by unknown id are never errors; only construction and persistence can fail.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("invalid character status '{0}' (expected free, imprisoned or dead)")]
    InvalidStatus(String),

    #[error("invalid personality '{0}' (expected calculator, loyalist, coward or schemer)")]
    InvalidPersonality(String),

    #[error("world state serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RulesError>;
