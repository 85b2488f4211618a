//! Core error types for tickdown-core.
//!
//! The split matters: configuration problems are fatal to the construction
//! attempt, usage problems are fatal to the offending call, and transition
//! no-ops are not errors at all -- they surface as [`crate::events::Advisory`]
//! notices. Storage failures never reach this module; the state store
//! swallows them and the engine keeps running in memory.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for tickdown-core.
#[derive(Error, Debug)]
pub enum TimerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// API misuse errors
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
///
/// Raised synchronously while validating [`crate::TimerOptions`] or while
/// loading the config file. A failed construction leaves no half-built
/// engine behind.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Data directory could not be resolved or created
    #[error("Failed to prepare data directory: {0}")]
    DataDir(String),
}

/// API misuse errors.
#[derive(Error, Debug)]
pub enum UsageError {
    /// `initialize()` called twice on the same engine. An engine is
    /// single-use per mount; build a fresh one instead.
    #[error("Engine already initialized")]
    AlreadyInitialized,
}

/// Result type alias for TimerError
pub type Result<T, E = TimerError> = std::result::Result<T, E>;
