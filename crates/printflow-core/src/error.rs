//! Error handling for PrintFlow
//!
//! Provides error types for the two fallible edges of the governor:
//! - Host errors (the collaborator rejected or failed an action)
//! - Configuration errors (invalid or unreadable settings)
//!
//! The governor's acknowledgment path itself never fails: unparseable lines
//! pass through and every branch produces a defined next state. Errors only
//! arise when calling out to the host or loading configuration.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Host collaborator error type
///
/// Returned by `HostPort` implementations when a send-permission or timeout
/// action cannot be applied.
#[derive(Error, Debug, Clone)]
pub enum HostError {
    /// The host has no active connection to act on
    #[error("Host not connected")]
    NotConnected,

    /// No pending permission was available to consume
    #[error("No pending send permission to consume")]
    NoPendingPermission,

    /// The host's permission counter is already at its ceiling
    #[error("Send permission ceiling reached: {ceiling}")]
    PermissionCeiling {
        /// The host's maximum outstanding-permission count.
        ceiling: u32,
    },

    /// The requested timeout is outside what the host accepts
    #[error("Unsupported acknowledgment timeout: {millis}ms")]
    UnsupportedTimeout {
        /// The rejected timeout in milliseconds.
        millis: u64,
    },

    /// Generic host error
    #[error("Host error: {message}")]
    Other {
        /// The error message.
        message: String,
    },
}

/// Configuration error type
///
/// Represents errors loading, saving, or validating governor settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A numeric setting is outside its valid range
    #[error("Invalid value for {setting}: {reason}")]
    InvalidValue {
        /// The setting with the invalid value.
        setting: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// Settings file could not be read or written
    #[error("Settings file error at {path}: {source}")]
    File {
        /// The file path involved.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Settings file did not deserialize
    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Main error type for PrintFlow
///
/// A unified error type for the public API surface.
#[derive(Error, Debug)]
pub enum Error {
    /// Host collaborator error
    #[error(transparent)]
    Host(#[from] HostError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a host error
    pub fn is_host_error(&self) -> bool {
        matches!(self, Error::Host(_))
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
