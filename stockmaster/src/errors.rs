//! Error types for the background services
//!
//! Expected operational failures (remote store down, notification relay
//! unreachable, bad configuration) are typed here so the orchestrators can turn
//! them into status entries instead of propagating them.

use thiserror::Error;

/// Configuration error variants
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to load configuration file
    #[error("Failed to load config from '{path}': {reason}")]
    LoadFailed { path: String, reason: String },

    /// Configuration parsing error
    #[error("Failed to parse config: {reason}")]
    ParseError { reason: String },

    /// Invalid configuration value
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Missing required configuration
    #[error("Missing required field: {field}")]
    MissingRequired { field: String },
}

/// Remote store error variants
#[derive(Debug, Error)]
pub enum RemoteError {
    /// No endpoint or credentials configured
    #[error("Remote store is not configured: {reason}")]
    NotConfigured { reason: String },

    /// Credentials were rejected
    #[error("Authentication with remote store failed: {reason}")]
    AuthenticationFailed { reason: String },

    /// Transport-level failure
    #[error("Remote request '{operation}' failed: {reason}")]
    RequestFailed { operation: String, reason: String },

    /// Store answered with a non-success status
    #[error("Remote request '{operation}' returned HTTP {status}")]
    UnexpectedStatus { operation: String, status: u16 },

    /// Store answered with a body we could not interpret
    #[error("Invalid response for '{operation}': {reason}")]
    InvalidResponse { operation: String, reason: String },

    /// Local file could not be read or written
    #[error("Local I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single job run. Every variant is caught by the service runner
/// and recorded as a failed run; none of them stops a service loop.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Remote store error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Inventory scan failed: {0}")]
    Scan(String),

    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    #[error("Local I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Job panicked: {0}")]
    Panicked(String),
}

impl JobError {
    /// Configuration errors refuse a service start; everything else is retried
    /// on the next tick.
    pub fn is_config(&self) -> bool {
        matches!(self, JobError::Config(_))
    }
}
