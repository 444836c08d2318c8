//! Configuration management for Bender
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//!
//! Precedence, lowest to highest: built-in defaults, YAML file,
//! `BENDER_API_URL`, `--api-url`.

use crate::error::{BenderError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Environment variable that overrides the assistant endpoint
pub const API_URL_ENV: &str = "BENDER_API_URL";

/// Main configuration structure for Bender
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Assistant service connection settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Conversation texts and labels
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Assistant service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Origin that relative `api_url` values are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Chat endpoint, absolute or relative to `base_url`
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_url() -> String {
    "/chat".to_string()
}

fn default_timeout_seconds() -> u64 {
    300
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_url: default_api_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ServerConfig {
    /// Resolve the chat endpoint to an absolute URL
    ///
    /// An absolute `api_url` is used as is; anything else is joined onto
    /// `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if either URL cannot be parsed
    ///
    /// # Examples
    ///
    /// ```
    /// use bender::config::ServerConfig;
    ///
    /// let server = ServerConfig::default();
    /// assert_eq!(server.endpoint().unwrap().as_str(), "http://localhost:8000/chat");
    /// ```
    pub fn endpoint(&self) -> Result<Url> {
        match Url::parse(&self.api_url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse(&self.base_url).map_err(|e| {
                    BenderError::Config(format!("Invalid base_url '{}': {}", self.base_url, e))
                })?;
                base.join(&self.api_url).map_err(|e| {
                    BenderError::Config(format!("Invalid api_url '{}': {}", self.api_url, e))
                        .into()
                })
            }
            Err(e) => Err(BenderError::Config(format!(
                "Invalid api_url '{}': {}",
                self.api_url, e
            ))
            .into()),
        }
    }
}

/// Conversation texts shown by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Display name of the assistant
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    /// Seed message of every fresh conversation
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// Substituted when the service answers without a reply
    #[serde(default = "default_fallback_reply")]
    pub fallback_reply: String,

    /// Shown as an assistant message when a request fails
    #[serde(default = "default_error_notice")]
    pub error_notice: String,

    /// Hint printed while the conversation is empty
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_assistant_name() -> String {
    "Asistente IA".to_string()
}

fn default_welcome_message() -> String {
    "¡Hola! Soy Bender, tu asistente IA. Puedo ayudarte con consultas sobre Jira y responder \
     preguntas generales. ¿En qué puedo ayudarte hoy?"
        .to_string()
}

fn default_fallback_reply() -> String {
    "Lo siento, no pude procesar tu mensaje.".to_string()
}

fn default_error_notice() -> String {
    "Lo siento, hubo un error al procesar tu mensaje. Por favor, intenta de nuevo.".to_string()
}

fn default_placeholder() -> String {
    "Puedes preguntarme sobre tickets de Jira, proyectos, o cualquier consulta general."
        .to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            assistant_name: default_assistant_name(),
            welcome_message: default_welcome_message(),
            fallback_reply: default_fallback_reply(),
            error_notice: default_error_notice(),
            placeholder: default_placeholder(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(BenderError::from)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config = serde_yaml::from_str(&contents)
            .map_err(BenderError::from)
            .with_context(|| format!("Failed to parse config {}", path))?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_url) = std::env::var(API_URL_ENV) {
            if api_url.trim().is_empty() {
                tracing::warn!("Ignoring empty {}", API_URL_ENV);
            } else {
                tracing::debug!("Using {} override: {}", API_URL_ENV, api_url);
                self.server.api_url = api_url;
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(api_url) = &cli.api_url {
            self.server.api_url = api_url.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is not an http(s) URL, the timeout is
    /// out of range, or one of the conversation texts is blank
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.server.endpoint()?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(BenderError::Config(format!(
                "Endpoint must use http or https, got: {}",
                endpoint
            ))
            .into());
        }

        if self.server.timeout_seconds == 0 {
            return Err(BenderError::Config(
                "server.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.server.timeout_seconds > 3600 {
            return Err(BenderError::Config(
                "server.timeout_seconds must be less than or equal to 3600".to_string(),
            )
            .into());
        }

        let texts = [
            ("chat.welcome_message", &self.chat.welcome_message),
            ("chat.fallback_reply", &self.chat.fallback_reply),
            ("chat.error_notice", &self.chat.error_notice),
        ];
        for (name, value) in texts {
            if value.trim().is_empty() {
                return Err(BenderError::Config(format!("{} cannot be empty", name)).into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use serial_test::serial;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["bender"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.api_url, "/chat");
        assert_eq!(config.server.timeout_seconds, 300);
        assert!(config.chat.welcome_message.starts_with("¡Hola! Soy Bender"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_relative_endpoint_joins_base_url() {
        let server = ServerConfig {
            base_url: "http://bender.internal:9000".to_string(),
            ..Default::default()
        };
        assert_eq!(
            server.endpoint().unwrap().as_str(),
            "http://bender.internal:9000/chat"
        );
    }

    #[test]
    fn test_absolute_endpoint_ignores_base_url() {
        let server = ServerConfig {
            base_url: "not a url".to_string(),
            api_url: "https://api.example.com/v2/chat".to_string(),
            ..Default::default()
        };
        assert_eq!(
            server.endpoint().unwrap().as_str(),
            "https://api.example.com/v2/chat"
        );
    }

    #[test]
    fn test_relative_endpoint_with_invalid_base_fails() {
        let server = ServerConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(server.endpoint().is_err());
    }

    #[test]
    fn test_validation_rejects_non_http_scheme() {
        let mut config = Config::default();
        config.server.api_url = "ftp://example.com/chat".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = Config::default();
        config.server.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_excessive_timeout() {
        let mut config = Config::default();
        config.server.timeout_seconds = 3601;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_blank_fallback() {
        let mut config = Config::default();
        config.chat.fallback_reply = "   ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("chat.fallback_reply"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
server:
  base_url: http://10.0.0.5:8000
chat:
  assistant_name: Bender
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.server.api_url, "/chat");
        assert_eq!(config.chat.assistant_name, "Bender");
        assert_eq!(
            config.chat.fallback_reply,
            "Lo siento, no pude procesar tu mensaje."
        );
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        std::env::remove_var(API_URL_ENV);
        let config = Config::load("nonexistent.yaml", &cli(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_and_cli_overrides_env() {
        std::env::set_var(API_URL_ENV, "http://env-host/chat");
        let from_env = Config::load("nonexistent.yaml", &cli(&[])).unwrap();
        assert_eq!(from_env.server.api_url, "http://env-host/chat");

        let from_cli = Config::load(
            "nonexistent.yaml",
            &cli(&["--api-url", "http://cli-host/chat"]),
        )
        .unwrap();
        assert_eq!(from_cli.server.api_url, "http://cli-host/chat");
        std::env::remove_var(API_URL_ENV);
    }

    #[test]
    #[serial]
    fn test_blank_env_override_is_ignored() {
        std::env::set_var(API_URL_ENV, "  ");
        let config = Config::load("nonexistent.yaml", &cli(&[])).unwrap();
        assert_eq!(config.server.api_url, "/chat");
        std::env::remove_var(API_URL_ENV);
    }

    #[test]
    fn test_invalid_yaml_file_is_yaml_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "server: [unclosed").unwrap();
        let err = Config::load(path.to_str().unwrap(), &cli(&[])).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        assert!(matches!(
            err.downcast_ref::<BenderError>(),
            Some(BenderError::Yaml(_))
        ));
    }

    #[test]
    fn test_unreadable_config_path_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Config::load(dir.path().to_str().unwrap(), &cli(&[])).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
        assert!(matches!(
            err.downcast_ref::<BenderError>(),
            Some(BenderError::Io(_))
        ));
    }
}
