//! Error types for twod
//!
//! Runtime errors are never fatal. Every error raised while talking to a
//! discovery endpoint or to the host-record service ends up in
//! [`Error::report`], which logs it at the severity of its class and lets the
//! poll loop carry on.

use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

/// Result type alias for twod operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for twod
#[derive(Error, Debug)]
pub enum Error {
    /// Connection failure or non-2xx HTTP status
    #[error("{0}")]
    Transport(String),

    /// The peer did not answer within the configured timeout
    #[error("server did not respond within {secs} seconds")]
    Timeout {
        /// Configured timeout, in seconds
        secs: f64,
    },

    /// The configured redirect limit was exceeded
    #[error("too many redirects")]
    TooManyRedirects,

    /// A payload carried something that is not an IP literal
    #[error("invalid IP address: {0:?}")]
    InvalidIp(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything nobody anticipated
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid IP error
    pub fn invalid_ip(value: impl Into<String>) -> Self {
        Self::InvalidIp(value.into())
    }

    /// Create an unexpected error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Whether this is one of the anticipated runtime failures
    ///
    /// Recoverable errors are logged at WARN, everything else at ERROR.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Timeout { .. } | Error::TooManyRedirects | Error::InvalidIp(_)
        )
    }

    /// Log an error that is being absorbed at the end of `operation`
    pub fn report(&self, operation: Operation) {
        match self {
            Error::Transport(msg) => {
                warn!("Error while {}: {}", operation, msg);
            }
            Error::Timeout { .. } | Error::TooManyRedirects => {
                warn!("Failed {}: {}", operation, self);
            }
            Error::InvalidIp(value) => {
                warn!(value = %value, "{} returned invalid IP", operation.origin());
            }
            _ => {
                error!(
                    "Unexpected error while {}, retrying at next interval: {}",
                    operation, self
                );
            }
        }
    }
}

/// The remote operations whose failures get reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// GET against a discovery endpoint
    DiscoverExternalIp,
    /// GET against the host-record service
    FetchRecordedIp,
    /// PUT against the host-record service
    UpdateRecordedIp,
}

impl Operation {
    /// Who produced the payload this operation reads
    pub fn origin(&self) -> &'static str {
        match self {
            Operation::DiscoverExternalIp => "External IP discovery",
            Operation::FetchRecordedIp | Operation::UpdateRecordedIp => "TwoDNS",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::DiscoverExternalIp => "fetching external IP",
            Operation::FetchRecordedIp => "fetching TwoDNS IP",
            Operation::UpdateRecordedIp => "updating TwoDNS IP",
        })
    }
}
