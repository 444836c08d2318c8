//! In-process fake transport for unit tests
//!
//! [`FakeTransport`] answers from a script of [`TransportResult`]s and
//! records every message it was asked to send. A held transport does not
//! answer until the test calls [`FakeTransport::release`], which lets tests
//! observe the controller while a request is in flight.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::transport::{ChatTransport, TransportResult};

/// Scripted transport for tests
#[derive(Debug)]
pub struct FakeTransport {
    replies: Mutex<VecDeque<TransportResult>>,
    sent: Mutex<Vec<String>>,
    gate: Option<Arc<Semaphore>>,
}

impl FakeTransport {
    /// Answer immediately with `replies`, in order
    ///
    /// Once the script is exhausted every call answers `Ok(None)`.
    pub fn new(replies: Vec<TransportResult>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            sent: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Like [`FakeTransport::new`], but each answer waits for a `release`
    pub fn held(replies: Vec<TransportResult>) -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::new(replies)
        }
    }

    /// Let one pending (or future) request complete
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Messages received so far
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for FakeTransport {
    async fn send_message(&self, text: &str) -> TransportResult {
        self.sent.lock().unwrap().push(text.to_string());

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        self.replies.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}
