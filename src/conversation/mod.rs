//! Conversation model and send lifecycle
//!
//! - `message`: message and role types, id generation
//! - `state`: the synchronous conversation with its two-phase send
//! - `controller`: the async, shareable controller used by front ends

pub mod controller;
pub mod message;
pub mod state;

pub use controller::ChatController;
pub use message::{Message, MessageFactory, Role};
pub use state::{Conversation, PendingSend, SendOutcome};
