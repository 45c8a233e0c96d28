//! Queue poller: long-poll receive, bounded invocation, all-or-nothing acknowledgement.
//!
//! Each received batch is one invocation. The handler runs under a wall-clock limit; a
//! timed-out invocation is dropped where it stands, with no cleanup, and its messages are
//! left to become visible again.
//!
//! Shutdown: [`PollerHandle::shutdown`] interrupts a pending receive but never an
//! invocation that is already running, then waits for the loop to exit.

use std::sync::Arc;
use std::time::{Duration, Instant};

use storefront_core::constants::{INVOCATION_TIMEOUT_SECS, MAX_QUEUE_BATCH_SIZE};
use storefront_infra::{MessageQueue, QueueError, QueueMessage};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::context::BatchHandler;

/// Pause after a failed receive before trying again.
pub const RECEIVE_ERROR_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub batch_size: usize,
    pub wait_time: Duration,
    pub invocation_timeout: Duration,
    /// Pause between empty receives. Only matters for queues that return immediately.
    pub idle_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            wait_time: Duration::from_secs(20),
            invocation_timeout: Duration::from_secs(INVOCATION_TIMEOUT_SECS),
            idle_interval: Duration::from_millis(100),
        }
    }
}

impl PollerConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_QUEUE_BATCH_SIZE);
        self
    }
}

/// What a single invocation did with its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Nothing was received.
    Idle,
    /// The handler succeeded and the messages were acknowledged.
    Completed(usize),
    /// The handler failed; nothing was acknowledged.
    Failed(usize),
    /// The handler ran past the invocation limit; nothing was acknowledged.
    TimedOut(usize),
}

pub struct QueuePoller {
    queue: Arc<dyn MessageQueue>,
    handler: Arc<dyn BatchHandler>,
    config: PollerConfig,
}

impl QueuePoller {
    pub fn new(
        queue: Arc<dyn MessageQueue>,
        handler: Arc<dyn BatchHandler>,
        config: PollerConfig,
    ) -> Self {
        Self {
            queue,
            handler,
            config,
        }
    }

    /// Receive one batch and invoke the handler on it.
    pub async fn poll_once(&self) -> Result<PollOutcome, QueueError> {
        let messages = self
            .queue
            .receive(self.config.batch_size, self.config.wait_time)
            .await?;
        self.invoke(messages).await
    }

    #[tracing::instrument(skip(self, messages), fields(handler = self.handler.name(), batch_size = messages.len()))]
    async fn invoke(&self, messages: Vec<QueueMessage>) -> Result<PollOutcome, QueueError> {
        if messages.is_empty() {
            return Ok(PollOutcome::Idle);
        }

        let count = messages.len();
        let start = Instant::now();
        let result =
            tokio::time::timeout(self.config.invocation_timeout, self.handler.handle(&messages))
                .await;

        match result {
            Ok(Ok(())) => {
                self.queue.acknowledge(&messages).await?;
                tracing::info!(
                    messages = count,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Invocation completed"
                );
                Ok(PollOutcome::Completed(count))
            }
            Ok(Err(e)) => {
                tracing::error!(
                    error = %e,
                    messages = count,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Invocation failed, batch left for redelivery"
                );
                Ok(PollOutcome::Failed(count))
            }
            Err(_) => {
                tracing::error!(
                    messages = count,
                    timeout_seconds = self.config.invocation_timeout.as_secs_f64(),
                    "Invocation timed out, batch left for redelivery"
                );
                Ok(PollOutcome::TimedOut(count))
            }
        }
    }

    /// Run the poll loop on its own task until shut down.
    pub fn spawn(self) -> PollerHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let join = tokio::spawn(self.run(shutdown_rx));
        PollerHandle { shutdown_tx, join }
    }

    async fn run(self, mut shutdown_rx: mpsc::Receiver<()>) {
        let name = self.handler.name();
        tracing::info!(
            handler = name,
            batch_size = self.config.batch_size,
            wait_time_secs = self.config.wait_time.as_secs(),
            invocation_timeout_secs = self.config.invocation_timeout.as_secs(),
            "Queue poller started"
        );

        loop {
            let received = tokio::select! {
                _ = shutdown_rx.recv() => break,
                received = self.queue.receive(self.config.batch_size, self.config.wait_time) => received,
            };

            match received {
                Ok(messages) if messages.is_empty() => {
                    tokio::time::sleep(self.config.idle_interval).await;
                }
                Ok(messages) => {
                    if let Err(e) = self.invoke(messages).await {
                        tracing::error!(handler = name, error = %e, "Failed to acknowledge batch");
                    }
                }
                Err(e) => {
                    tracing::error!(handler = name, error = %e, "Failed to receive from queue");
                    tokio::time::sleep(Duration::from_millis(RECEIVE_ERROR_BACKOFF_MS)).await;
                }
            }
        }

        tracing::info!(handler = name, "Queue poller stopped");
    }
}

pub struct PollerHandle {
    shutdown_tx: mpsc::Sender<()>,
    join: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop receiving and wait for any running invocation to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.join.await {
            tracing::error!(error = %e, "Queue poller task ended abnormally");
        }
    }
}
