//! Chat message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::{Generator, Ulid};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the person at the terminal
    User,
    /// Produced by (or on behalf of) the assistant service
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single entry of the conversation
///
/// Messages are immutable once created. The timestamp is for display only;
/// list position decides ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Opaque unique identifier, increasing in creation order
    pub id: String,
    /// Display text, already trimmed
    pub content: String,
    /// Author of the message
    pub role: Role,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(id: Ulid, role: Role, content: &str) -> Self {
        Self {
            id: id.to_string(),
            content: content.trim().to_string(),
            role,
            timestamp: Utc::now(),
        }
    }

    /// Returns true if the message was typed by the user
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Produces message ids that sort in creation order
///
/// Ids are monotonic ULIDs: two messages created within the same
/// millisecond still get distinct, ordered ids.
pub struct MessageFactory {
    ids: Generator,
}

impl MessageFactory {
    /// Create a new factory
    pub fn new() -> Self {
        Self {
            ids: Generator::new(),
        }
    }

    fn next_id(&mut self) -> Ulid {
        // Overflow only happens after 2^80 ids in one millisecond.
        self.ids.generate().unwrap_or_else(|_| Ulid::new())
    }

    /// Create a user message from already validated text
    ///
    /// # Examples
    ///
    /// ```
    /// use bender::conversation::{MessageFactory, Role};
    ///
    /// let mut factory = MessageFactory::new();
    /// let message = factory.user("  Hola  ");
    /// assert_eq!(message.content, "Hola");
    /// assert_eq!(message.role, Role::User);
    /// ```
    pub fn user(&mut self, content: &str) -> Message {
        let id = self.next_id();
        Message::new(id, Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(&mut self, content: &str) -> Message {
        let id = self.next_id();
        Message::new(id, Role::Assistant, content)
    }
}

impl Default for MessageFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MessageFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageFactory").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut factory = MessageFactory::new();
        let ids: Vec<String> = (0..100).map(|_| factory.user("x").id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_content_is_trimmed() {
        let mut factory = MessageFactory::new();
        let message = factory.assistant("\n respuesta \t");
        assert_eq!(message.content, "respuesta");
        assert!(!message.is_user());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }
}
