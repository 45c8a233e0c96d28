//! Batch handler trait
//!
//! A poller hands every received batch to one handler. Returning `Ok` acknowledges the whole
//! batch; returning `Err` leaves every message on the queue for redelivery.

use anyhow::Result;
use async_trait::async_trait;
use storefront_infra::QueueMessage;

#[async_trait]
pub trait BatchHandler: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn handle(&self, messages: &[QueueMessage]) -> Result<()>;
}
