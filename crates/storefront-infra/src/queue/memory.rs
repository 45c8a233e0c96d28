use super::{MessageQueue, QueueError, QueueMessage};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;
use uuid::Uuid;

#[derive(Default)]
struct QueueState {
    ready: VecDeque<(String, String)>,
    in_flight: HashMap<String, (String, String)>,
    sent: Vec<String>,
    fail_sends_containing: Option<String>,
}

/// Process-local queue with visibility semantics.
///
/// Received messages move to an in-flight set until acknowledged.
/// [`InMemoryQueue::redeliver_unacknowledged`] plays the part of an expired visibility
/// timeout.
#[derive(Default)]
pub struct InMemoryQueue {
    state: Mutex<QueueState>,
    notify: Notify,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every send whose body contains `needle`.
    pub fn fail_sends_containing(&self, needle: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_sends_containing = Some(needle.into());
        }
    }

    /// Bodies of every accepted send, in order.
    pub fn sent_bodies(&self) -> Vec<String> {
        self.state.lock().map(|s| s.sent.clone()).unwrap_or_default()
    }

    /// Messages waiting to be received.
    pub fn pending(&self) -> usize {
        self.state.lock().map(|s| s.ready.len()).unwrap_or(0)
    }

    /// Messages received but not yet acknowledged.
    pub fn in_flight(&self) -> usize {
        self.state.lock().map(|s| s.in_flight.len()).unwrap_or(0)
    }

    /// Return every unacknowledged message to the queue.
    pub fn redeliver_unacknowledged(&self) {
        if let Ok(mut state) = self.state.lock() {
            let returned: Vec<_> = state.in_flight.drain().map(|(_, m)| m).collect();
            state.ready.extend(returned);
        }
        self.notify.notify_waiters();
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, QueueState>, String> {
        self.state
            .lock()
            .map_err(|_| "queue lock poisoned".to_string())
    }

    fn take_ready(&self, max_messages: usize) -> Result<Vec<QueueMessage>, QueueError> {
        let mut state = self.lock().map_err(QueueError::ReceiveFailed)?;
        let mut messages = Vec::new();
        while messages.len() < max_messages {
            let Some((message_id, body)) = state.ready.pop_front() else {
                break;
            };
            let receipt_handle = Uuid::new_v4().to_string();
            state
                .in_flight
                .insert(receipt_handle.clone(), (message_id.clone(), body.clone()));
            messages.push(QueueMessage {
                message_id,
                receipt_handle,
                body,
            });
        }
        Ok(messages)
    }
}

#[async_trait]
impl MessageQueue for InMemoryQueue {
    async fn send(&self, body: &str) -> Result<(), QueueError> {
        {
            let mut state = self.lock().map_err(QueueError::SendFailed)?;
            if let Some(needle) = &state.fail_sends_containing {
                if body.contains(needle.as_str()) {
                    return Err(QueueError::SendFailed(format!(
                        "send rejected for body {}",
                        body
                    )));
                }
            }
            state.sent.push(body.to_string());
            state
                .ready
                .push_back((Uuid::new_v4().to_string(), body.to_string()));
        }
        self.notify.notify_waiters();
        Ok(())
    }

    async fn receive(
        &self,
        max_messages: usize,
        wait: Duration,
    ) -> Result<Vec<QueueMessage>, QueueError> {
        let notified = self.notify.notified();
        let messages = self.take_ready(max_messages)?;
        if !messages.is_empty() || wait.is_zero() {
            return Ok(messages);
        }
        // Long poll: wait for a send or until the wait elapses.
        let _ = tokio::time::timeout(wait, notified).await;
        self.take_ready(max_messages)
    }

    async fn acknowledge(&self, messages: &[QueueMessage]) -> Result<(), QueueError> {
        let mut state = self.lock().map_err(QueueError::AcknowledgeFailed)?;
        for message in messages {
            state.in_flight.remove(&message.receipt_handle);
        }
        Ok(())
    }
}
