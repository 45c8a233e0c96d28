//! Message queue abstraction
//!
//! Delivery is at-least-once. A received message stays invisible until it is acknowledged;
//! messages that are never acknowledged are delivered again later.

mod memory;
#[cfg(feature = "aws")]
pub mod sqs;

pub use memory::InMemoryQueue;

use async_trait::async_trait;
use std::time::Duration;
use storefront_core::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    #[error("Acknowledge failed: {0}")]
    AcknowledgeFailed(String),
}

impl From<QueueError> for AppError {
    fn from(err: QueueError) -> Self {
        AppError::TransientDependency(err.to_string())
    }
}

/// A message handed out by [`MessageQueue::receive`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueueMessage {
    pub message_id: String,
    /// Handle used to acknowledge this particular delivery.
    pub receipt_handle: String,
    pub body: String,
}

#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Enqueue one message body.
    async fn send(&self, body: &str) -> Result<(), QueueError>;

    /// Receive up to `max_messages`, waiting at most `wait` for the first one.
    async fn receive(
        &self,
        max_messages: usize,
        wait: Duration,
    ) -> Result<Vec<QueueMessage>, QueueError>;

    /// Delete delivered messages so they are not redelivered.
    async fn acknowledge(&self, messages: &[QueueMessage]) -> Result<(), QueueError>;
}
