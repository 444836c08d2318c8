//! Error types for Bender
//!
//! This module defines the error types used by the chat client, using
//! `thiserror` for ergonomic error handling. Transport failures have their
//! own enum ([`TransportError`]) because the conversation controller
//! absorbs them instead of propagating them.

use thiserror::Error;

/// Main error type for Bender operations
///
/// Covers failures of the front end: configuration loading and
/// validation, terminal I/O, and serialization of output.
#[derive(Error, Debug)]
pub enum BenderError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input the client refuses to send
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Interactive terminal errors (readline setup, history)
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Classified failure of a single request to the assistant service
///
/// The controller only needs to know that the call failed; the variants
/// exist so logs and tests can tell the causes apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The service answered with a non-2xx status
    #[error("Assistant service returned HTTP {status}: {detail}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error detail from the response body, or the canonical reason
        detail: String,
    },

    /// Connection, timeout, or body read failure
    #[error("Network error: {0}")]
    Network(String),

    /// The response body was not the expected JSON document
    #[error("Malformed response body: {0}")]
    MalformedBody(String),
}

/// Result type alias for Bender operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
