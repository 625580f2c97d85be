//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Slot length must be between 15 and 180 minutes")]
    InvalidSlotLength,

    #[error("Lead times cannot be negative")]
    NegativeLeadTime,

    #[error("Default hourly rate cannot be negative")]
    NegativeRate,

    #[error("Currency must be a three-letter lowercase ISO code")]
    InvalidCurrency,

    #[error("Poll interval must be at least 1 second")]
    InvalidPollInterval,
}
