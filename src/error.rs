//! Error types for the sorted set client

use thiserror::Error;

/// Result type for client operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while issuing commands or decoding replies
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// RESP protocol parsing error
    #[error("RESP protocol error: {0}")]
    RespError(String),

    /// The server answered with an error reply
    #[error("Server error: {0}")]
    ServerError(String),

    /// The reply had a shape the caller could not decode
    #[error("Unexpected reply: expected {expected}, found {found}")]
    UnexpectedReply {
        expected: &'static str,
        found: String,
    },

    /// Rejected before dispatch
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A frame exceeded the codec limit
    #[error("Frame of {size} bytes exceeds the limit of {limit} bytes")]
    FrameTooLarge { size: usize, limit: usize },

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A connect or request deadline elapsed
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ProtocolError {
    /// Build an `UnexpectedReply` from the value that failed to decode
    pub(crate) fn unexpected(expected: &'static str, found: impl std::fmt::Display) -> Self {
        ProtocolError::UnexpectedReply {
            expected,
            found: found.to_string(),
        }
    }
}

impl From<toml::de::Error> for ProtocolError {
    fn from(err: toml::de::Error) -> Self {
        ProtocolError::ConfigError(err.to_string())
    }
}

impl From<toml::ser::Error> for ProtocolError {
    fn from(err: toml::ser::Error) -> Self {
        ProtocolError::ConfigError(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for ProtocolError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ProtocolError::Timeout(err.to_string())
    }
}
