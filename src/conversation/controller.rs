//! Async conversation controller
//!
//! [`ChatController`] wraps a [`Conversation`] and a [`ChatTransport`]. It
//! is cheap to clone; clones share the same conversation, so one clone can
//! await a reply while another clears the history or takes snapshots.
//!
//! The state lock is only taken for the synchronous halves of a send and is
//! never held across the transport call.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::ChatConfig;
use crate::conversation::message::Message;
use crate::conversation::state::{Conversation, PendingSend, SendOutcome};
use crate::error::TransportError;
use crate::transport::{ChatTransport, TransportResult};
use crate::view::ViewModel;

/// Owns the conversation and drives the send lifecycle
#[derive(Debug, Clone)]
pub struct ChatController {
    state: Arc<Mutex<Conversation>>,
    transport: Arc<dyn ChatTransport>,
}

impl ChatController {
    /// Create a controller with a fresh conversation
    ///
    /// # Arguments
    ///
    /// * `transport` - Collaborator that reaches the assistant service
    /// * `texts` - Welcome, fallback, and error texts
    pub fn new(transport: Arc<dyn ChatTransport>, texts: ChatConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(Conversation::new(texts))),
            transport,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Conversation> {
        lock_state(&self.state)
    }

    /// Send a user message and wait for the assistant's answer
    ///
    /// Blank input and input arriving while a reply is pending are ignored.
    /// Transport failures never surface as errors: the conversation shows
    /// them as an assistant message instead. The returned outcome is
    /// informational.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use async_trait::async_trait;
    /// use bender::config::ChatConfig;
    /// use bender::transport::{ChatTransport, TransportResult};
    /// use bender::{ChatController, SendOutcome};
    ///
    /// #[derive(Debug)]
    /// struct Echo;
    ///
    /// #[async_trait]
    /// impl ChatTransport for Echo {
    ///     async fn send_message(&self, text: &str) -> TransportResult {
    ///         Ok(Some(format!("eco: {}", text)))
    ///     }
    /// }
    ///
    /// # tokio_test::block_on(async {
    /// let controller = ChatController::new(Arc::new(Echo), ChatConfig::default());
    /// assert_eq!(controller.send("hola").await, SendOutcome::Replied);
    /// assert_eq!(controller.view_model().last().unwrap().content, "eco: hola");
    /// # });
    /// ```
    pub async fn send(&self, text: &str) -> SendOutcome {
        match self.submit(text) {
            Some(pending) => self.resolve(pending).await,
            None => SendOutcome::Rejected,
        }
    }

    /// First half of [`ChatController::send`]
    ///
    /// Appends the user message and raises the typing flag, or returns
    /// `None` if the input is rejected. Front ends that render between the
    /// two halves call this, then hand the ticket to
    /// [`ChatController::resolve`].
    pub fn submit(&self, text: &str) -> Option<PendingSend> {
        self.lock().begin_send(text)
    }

    /// Second half of [`ChatController::send`]
    ///
    /// Performs the transport call and applies its result.
    ///
    /// The ticket is applied even if the returned future is dropped before
    /// it finishes: the conversation then gets the error notice and the
    /// typing flag is lowered.
    pub fn resolve(
        &self,
        pending: PendingSend,
    ) -> impl Future<Output = SendOutcome> + Send + '_ {
        let text = pending.text().to_string();
        let mut in_flight = InFlight {
            state: &self.state,
            pending: Some(pending),
        };

        async move {
            let result = self.transport.send_message(&text).await;

            let outcome = in_flight.finish(result);
            tracing::debug!(?outcome, "Send completed");
            outcome
        }
    }

    /// Reset the conversation to its welcome message
    ///
    /// Safe to call while a send is pending; that send's reply is dropped.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Consistent snapshot for renderers
    pub fn view_model(&self) -> ViewModel {
        self.lock().view_model()
    }

    /// Copy of the messages in insertion order
    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages().to_vec()
    }

    /// Whether a reply is pending
    pub fn is_typing(&self) -> bool {
        self.lock().is_typing()
    }

    /// Number of messages, welcome message included
    pub fn message_count(&self) -> usize {
        self.lock().message_count()
    }
}

fn lock_state(state: &Mutex<Conversation>) -> MutexGuard<'_, Conversation> {
    // Conversation methods do not panic midway, so a poisoned lock
    // still guards consistent state.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ticket of a send whose transport call has not returned yet
///
/// Dropping it unfinished completes the send as a cancelled request.
struct InFlight<'a> {
    state: &'a Mutex<Conversation>,
    pending: Option<PendingSend>,
}

impl InFlight<'_> {
    fn finish(&mut self, result: TransportResult) -> SendOutcome {
        match self.pending.take() {
            Some(pending) => lock_state(self.state).complete(pending, result),
            None => SendOutcome::Discarded,
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.pending.is_some() {
            tracing::debug!("Send dropped before the assistant answered");
            let outcome =
                self.finish(Err(TransportError::Network("request cancelled".to_string())));
            tracing::debug!(?outcome, "Cancelled send completed");
        }
    }
}
