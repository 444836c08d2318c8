//! Bender - terminal chat client library
//!
//! This library provides the conversation controller behind the `bender`
//! chat client: message history, the send lifecycle with its typing
//! indicator and error fallback, and the HTTP transport to the assistant
//! service.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `conversation`: Messages, conversation state, and the async controller
//! - `transport`: Transport abstraction and the HTTP implementation
//! - `view`: Read-only view model projection for renderers
//! - `render`: Terminal renderer for view models
//! - `commands`: CLI command handlers
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bender::{ChatController, Config, HttpTransport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let transport = HttpTransport::from_config(&config.server)?;
//!     let controller = ChatController::new(Arc::new(transport), config.chat.clone());
//!     controller.send("tickets abiertos").await;
//!     println!("{:?}", controller.view_model().last());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;
pub mod render;
pub mod transport;
pub mod view;

// Re-export commonly used types
pub use config::Config;
pub use conversation::{ChatController, Conversation, Message, Role, SendOutcome};
pub use error::{BenderError, Result, TransportError};
pub use transport::{ChatTransport, HttpTransport};
pub use view::ViewModel;
