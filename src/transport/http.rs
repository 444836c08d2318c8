//! HTTP transport for the assistant service
//!
//! Every message is one `POST` with a JSON body. The whole response body is
//! read before it is interpreted, so a failure to read it counts as a
//! network error and a body that is not the expected document counts as a
//! malformed body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::ServerConfig;
use crate::error::{BenderError, Result, TransportError};
use crate::transport::{ChatRequest, ChatResponse, ChatTransport, ErrorBody, TransportResult};

/// Assistant transport over a single HTTP endpoint
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use url::Url;
/// use bender::transport::HttpTransport;
///
/// let transport = HttpTransport::new(
///     Url::parse("http://localhost:8000/chat").unwrap(),
///     Duration::from_secs(30),
/// )
/// .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Construct a transport targeting `endpoint`
    ///
    /// No network I/O is performed at construction time.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Absolute URL of the chat endpoint
    /// * `timeout` - Per-request timeout, covering the whole round trip
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built (TLS backend setup)
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BenderError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    /// Construct a transport from the `server` configuration section
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint does not resolve or the client cannot
    /// be built
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        Self::new(
            config.endpoint()?,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// The resolved endpoint this transport posts to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send_message(&self, text: &str) -> TransportResult {
        tracing::debug!(
            endpoint = %self.endpoint,
            chars = text.chars().count(),
            "Sending message to assistant"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&ChatRequest { mensaje: text })
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Assistant request failed: {}", e);
                TransportError::Network(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::warn!("Failed to read assistant response: {}", e);
            TransportError::Network(e.to_string())
        })?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .map(|b| b.error)
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown status")
                        .to_string()
                });
            tracing::warn!("Assistant returned error {}: {}", status, detail);
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Failed to parse assistant response: {}", e);
            TransportError::MalformedBody(e.to_string())
        })?;

        tracing::debug!(
            has_reply = parsed.respuesta.is_some(),
            bytes = body.len(),
            "Assistant response received"
        );

        Ok(parsed.respuesta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config_resolves_endpoint() {
        let transport = HttpTransport::from_config(&ServerConfig::default()).unwrap();
        assert_eq!(transport.endpoint().as_str(), "http://localhost:8000/chat");
    }

    #[test]
    fn test_from_config_with_bad_base_fails() {
        let config = ServerConfig {
            base_url: "::nope::".to_string(),
            ..Default::default()
        };
        assert!(HttpTransport::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Port 9 (discard) on localhost is closed on test machines.
        let transport = HttpTransport::new(
            Url::parse("http://127.0.0.1:9/chat").unwrap(),
            Duration::from_secs(2),
        )
        .unwrap();
        let result = transport.send_message("hola").await;
        assert!(matches!(result, Err(TransportError::Network(_))));
    }
}
