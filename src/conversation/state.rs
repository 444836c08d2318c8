//! Conversation state and the two-phase send protocol
//!
//! [`Conversation`] is the synchronous core of the client. A send is split
//! in two:
//!
//! 1. [`Conversation::begin_send`] validates the input, appends the user
//!    message, raises the typing flag, and hands back a [`PendingSend`].
//! 2. [`Conversation::complete`] consumes that ticket together with the
//!    transport result and appends the assistant message.
//!
//! Because the ticket is moved into `complete`, a completion can be applied
//! at most once. Every [`Conversation::clear`] starts a new generation, and
//! tickets from an older generation are discarded on completion.

use crate::config::ChatConfig;
use crate::conversation::message::{Message, MessageFactory};
use crate::transport::TransportResult;
use crate::view::{self, ViewModel};

/// How a send call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or a reply was still pending; nothing changed
    Rejected,
    /// The assistant's reply was appended
    Replied,
    /// The service answered without a reply; the fallback text was appended
    Fallback,
    /// The request failed; the error notice was appended
    Failed,
    /// The conversation was cleared while the request was in flight
    Discarded,
}

/// Ticket for an accepted send awaiting its transport result
#[derive(Debug)]
#[must_use = "a pending send must be completed or the typing flag stays raised"]
pub struct PendingSend {
    generation: u64,
    text: String,
}

impl PendingSend {
    /// The trimmed text to hand to the transport
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Ordered message history plus the typing flag
///
/// Never empty: the welcome message is always the first entry.
#[derive(Debug)]
pub struct Conversation {
    messages: Vec<Message>,
    typing: bool,
    generation: u64,
    factory: MessageFactory,
    texts: ChatConfig,
}

impl Conversation {
    /// Create a conversation seeded with the welcome message
    ///
    /// # Examples
    ///
    /// ```
    /// use bender::config::ChatConfig;
    /// use bender::conversation::Conversation;
    ///
    /// let conversation = Conversation::new(ChatConfig::default());
    /// assert_eq!(conversation.message_count(), 1);
    /// assert!(!conversation.is_typing());
    /// ```
    pub fn new(texts: ChatConfig) -> Self {
        let mut factory = MessageFactory::new();
        let welcome = factory.assistant(&texts.welcome_message);
        Self {
            messages: vec![welcome],
            typing: false,
            generation: 0,
            factory,
            texts,
        }
    }

    /// Start a send
    ///
    /// Returns `None` without touching any state if the trimmed text is
    /// empty or a reply is already pending.
    pub fn begin_send(&mut self, text: &str) -> Option<PendingSend> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::trace!("Ignoring blank input");
            return None;
        }
        if self.typing {
            tracing::debug!("Ignoring input while a reply is pending");
            return None;
        }

        let message = self.factory.user(trimmed);
        self.messages.push(message);
        self.typing = true;

        Some(PendingSend {
            generation: self.generation,
            text: trimmed.to_string(),
        })
    }

    /// Apply the transport result of an accepted send
    ///
    /// Always lowers the typing flag of the generation the ticket belongs
    /// to. A ticket from before the last [`Conversation::clear`] changes
    /// nothing.
    pub fn complete(&mut self, pending: PendingSend, result: TransportResult) -> SendOutcome {
        if pending.generation != self.generation {
            tracing::debug!(
                ticket = pending.generation,
                current = self.generation,
                "Dropping reply for a cleared conversation"
            );
            return SendOutcome::Discarded;
        }

        let (content, outcome) = match result {
            Ok(Some(reply)) if !reply.trim().is_empty() => (reply, SendOutcome::Replied),
            Ok(_) => {
                tracing::debug!("Assistant answered without a reply, using fallback");
                (self.texts.fallback_reply.clone(), SendOutcome::Fallback)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Assistant request failed");
                (self.texts.error_notice.clone(), SendOutcome::Failed)
            }
        };

        let message = self.factory.assistant(&content);
        self.messages.push(message);
        self.typing = false;

        outcome
    }

    /// Reset to a single fresh welcome message
    ///
    /// Also lowers the typing flag and invalidates any pending ticket.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.typing = false;
        let welcome = self.factory.assistant(&self.texts.welcome_message);
        self.messages = vec![welcome];
        tracing::debug!(generation = self.generation, "Conversation cleared");
    }

    /// Snapshot for renderers
    pub fn view_model(&self) -> ViewModel {
        view::project(&self.messages, self.typing)
    }

    /// Messages in insertion order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages, welcome message included
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Whether a reply is pending
    pub fn is_typing(&self) -> bool {
        self.typing
    }
}
