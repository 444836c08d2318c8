//! Read-only projection of the conversation for display layers

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::conversation::{Message, Role};

/// One renderable message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRow {
    /// Message id, stable across snapshots
    pub id: String,
    /// Display text
    pub content: String,
    /// Author
    pub role: Role,
    /// Local wall-clock time, `HH:MM`
    pub timestamp_display: String,
}

/// Snapshot handed to renderers
///
/// A view model is a copy: holding one never blocks or observes the
/// controller mid-update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    /// Messages in conversation order, welcome message first
    pub rows: Vec<MessageRow>,
    /// Whether the assistant is working on a reply
    pub typing: bool,
    /// True when only the welcome message is present
    pub is_empty: bool,
}

impl ViewModel {
    /// The most recent row
    pub fn last(&self) -> Option<&MessageRow> {
        self.rows.last()
    }
}

/// Build a view model from the conversation state
///
/// # Examples
///
/// ```
/// use bender::conversation::MessageFactory;
/// use bender::view::project;
///
/// let mut factory = MessageFactory::new();
/// let messages = vec![factory.assistant("Hola")];
/// let view = project(&messages, false);
/// assert!(view.is_empty);
/// assert_eq!(view.rows[0].content, "Hola");
/// ```
pub fn project(messages: &[Message], typing: bool) -> ViewModel {
    ViewModel {
        rows: messages.iter().map(row).collect(),
        typing,
        is_empty: messages.len() == 1,
    }
}

fn row(message: &Message) -> MessageRow {
    MessageRow {
        id: message.id.clone(),
        content: message.content.clone(),
        role: message.role,
        timestamp_display: format_timestamp(&message.timestamp),
    }
}

/// Format a timestamp as local `HH:MM`
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}
