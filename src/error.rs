//! Error types

use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// clickhouse-testkit error
#[derive(Debug, Error)]
pub enum Error {
    /// The named test environment could not be resolved
    #[error("test environment '{name}': {reason}")]
    Environment {
        /// Environment name as requested by the caller
        name: String,
        /// What went wrong
        reason: String,
    },

    /// Protocol name not recognized
    #[error("unsupport protocol - {0}")]
    UnsupportedProtocol(String),

    /// Server is older than a test requires
    #[error("unsupported server version {actual} < {required}")]
    UnsupportedServerVersion {
        /// Version reported by the server
        actual: crate::testing::ServerVersion,
        /// Minimum version the caller asked for
        required: crate::testing::ServerVersion,
    },

    /// Invalid connection string, options, or TLS material
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP interface error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Native protocol driver error
    #[error("native protocol error: {0}")]
    Native(#[from] klickhouse::KlickhouseError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server answered with an error
    #[error("server error (status {status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Dialing did not finish within the configured timeout
    #[error("dial timeout after {0:?}")]
    Timeout(Duration),
}

impl Error {
    /// Build an environment resolution error
    pub(crate) fn environment(name: &str, reason: impl Into<String>) -> Self {
        Self::Environment {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if this error came from the caller's input rather than the server
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::UnsupportedProtocol(_) | Error::Environment { .. }
        )
    }

    /// Error category for metrics labels
    pub fn category(&self) -> &'static str {
        match self {
            Error::Environment { .. } => "environment",
            Error::UnsupportedProtocol(_) => "unsupported_protocol",
            Error::UnsupportedServerVersion { .. } => "unsupported_version",
            Error::Config(_) => "config",
            Error::Io(_) => "io",
            Error::Http(_) => "http",
            Error::Native(_) => "native",
            Error::Json(_) => "json",
            Error::Server { .. } => "server",
            Error::Timeout(_) => "timeout",
        }
    }
}
