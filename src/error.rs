//! Error types for the hint engine.

use thiserror::Error;

/// Errors returned to the caller across the keystroke boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The key is not one of the configured motion keys.
    #[error("invalid motion key: {0:?}")]
    InvalidMotionKey(char),

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised while parsing or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The word pattern is not a valid regular expression.
    #[error("invalid word pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// A key appears twice in the same pool.
    #[error("duplicate key {key:?} in {pool}")]
    DuplicateKey { pool: &'static str, key: char },

    /// The fallback marker alphabet is empty.
    #[error("marker alphabet must not be empty")]
    EmptyMarkers,

    /// A field that must be at least one was zero.
    #[error("{field} must be at least 1")]
    Zero { field: &'static str },

    /// A per-key override names a key that is not a motion key.
    #[error("{field} names {key:?}, which is not a configured motion key")]
    UnknownMotionKey { field: &'static str, key: char },
}

/// A failed call into the host editor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("recenter failed: {0}")]
    Recenter(String),

    #[error("display failed: {0}")]
    Display(String),

    #[error("cursor move failed: {0}")]
    Cursor(String),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
