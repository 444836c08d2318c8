//! Transport to the remote assistant service
//!
//! This module defines the [`ChatTransport`] trait, the seam between the
//! conversation controller and the network. Implementations:
//!
//! - [`http::HttpTransport`] -- a single JSON `POST` per message.
//! - `fake::FakeTransport` -- scripted in-process replies (tests only).
//!
//! # Wire format
//!
//! Request body `{"mensaje": "<text>"}`, success body
//! `{"respuesta": "<reply>"}`. Non-2xx responses may carry
//! `{"error": "<detail>"}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Outcome of one request
///
/// `Ok(None)` means the service answered successfully but without a reply
/// field; the controller substitutes its fallback text.
pub type TransportResult = std::result::Result<Option<String>, TransportError>;

/// Abstraction over the request/response call to the assistant
///
/// Implementations must classify every failure into a [`TransportError`]
/// and never panic.
#[async_trait]
pub trait ChatTransport: Send + Sync + std::fmt::Debug {
    /// Send one user message and wait for the assistant's reply
    ///
    /// # Arguments
    ///
    /// * `text` - The trimmed, non-empty user message
    async fn send_message(&self, text: &str) -> TransportResult;
}

/// Request body sent to the assistant service
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub(crate) mensaje: &'a str,
}

/// Success body returned by the assistant service
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub(crate) respuesta: Option<String>,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}

pub mod http;

#[cfg(test)]
pub mod fake;

pub use http::HttpTransport;
