use super::{MessageQueue, QueueError, QueueMessage};
use async_trait::async_trait;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::Client;
use aws_config::SdkConfig;
use std::time::Duration;
use storefront_core::constants::MAX_QUEUE_BATCH_SIZE;

/// SQS-backed queue.
#[derive(Clone)]
pub struct SqsQueue {
    client: Client,
    queue_url: String,
}

impl SqsQueue {
    pub fn new(sdk_config: &SdkConfig, queue_url: String) -> Self {
        Self {
            client: Client::new(sdk_config),
            queue_url,
        }
    }

    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }
}

#[async_trait]
impl MessageQueue for SqsQueue {
    async fn send(&self, body: &str) -> Result<(), QueueError> {
        let start = std::time::Instant::now();

        let output = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    queue_url = %self.queue_url,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "SQS send failed"
                );
                QueueError::SendFailed(DisplayErrorContext(&e).to_string())
            })?;

        tracing::debug!(
            queue_url = %self.queue_url,
            message_id = output.message_id().unwrap_or_default(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "SQS message sent"
        );

        Ok(())
    }

    async fn receive(
        &self,
        max_messages: usize,
        wait: Duration,
    ) -> Result<Vec<QueueMessage>, QueueError> {
        let max = max_messages.clamp(1, MAX_QUEUE_BATCH_SIZE) as i32;
        let wait_secs = wait.as_secs().min(20) as i32;

        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(max)
            .wait_time_seconds(wait_secs)
            .send()
            .await
            .map_err(|e| QueueError::ReceiveFailed(DisplayErrorContext(&e).to_string()))?;

        let messages = output
            .messages()
            .iter()
            .filter_map(|m| {
                let receipt_handle = m.receipt_handle()?.to_string();
                Some(QueueMessage {
                    message_id: m.message_id().unwrap_or_default().to_string(),
                    receipt_handle,
                    body: m.body().unwrap_or_default().to_string(),
                })
            })
            .collect::<Vec<_>>();

        if !messages.is_empty() {
            tracing::debug!(
                queue_url = %self.queue_url,
                count = messages.len(),
                "SQS messages received"
            );
        }

        Ok(messages)
    }

    async fn acknowledge(&self, messages: &[QueueMessage]) -> Result<(), QueueError> {
        for message in messages {
            self.client
                .delete_message()
                .queue_url(&self.queue_url)
                .receipt_handle(&message.receipt_handle)
                .send()
                .await
                .map_err(|e| {
                    tracing::warn!(
                        error = %DisplayErrorContext(&e),
                        queue_url = %self.queue_url,
                        message_id = %message.message_id,
                        "SQS delete failed"
                    );
                    QueueError::AcknowledgeFailed(DisplayErrorContext(&e).to_string())
                })?;
        }
        Ok(())
    }
}
