//! Handlers binding queue deliveries to the pipeline stages.

use anyhow::{Context, Result};
use async_trait::async_trait;
use storefront_infra::QueueMessage;
use storefront_services::{CatalogBatchProcessor, CatalogRecord, ImportFileParser, S3Event};

use crate::context::BatchHandler;

/// Bucket notifications delivered through the upload-events queue.
pub struct UploadEventHandler {
    parser: ImportFileParser,
}

impl UploadEventHandler {
    pub fn new(parser: ImportFileParser) -> Self {
        Self { parser }
    }
}

#[async_trait]
impl BatchHandler for UploadEventHandler {
    fn name(&self) -> &'static str {
        "upload-events"
    }

    async fn handle(&self, messages: &[QueueMessage]) -> Result<()> {
        for message in messages {
            let event = S3Event::from_json(&message.body).with_context(|| {
                format!("Undecodable bucket event in message {}", message.message_id)
            })?;

            let report = self.parser.handle_event(&event).await?;

            tracing::debug!(
                message_id = %message.message_id,
                objects = report.objects.len(),
                body = %report.body,
                "Upload event handled"
            );
        }
        Ok(())
    }
}

/// Catalog messages delivered to the batch consumer.
pub struct CatalogBatchHandler {
    processor: CatalogBatchProcessor,
}

impl CatalogBatchHandler {
    pub fn new(processor: CatalogBatchProcessor) -> Self {
        Self { processor }
    }
}

#[async_trait]
impl BatchHandler for CatalogBatchHandler {
    fn name(&self) -> &'static str {
        "catalog-batch"
    }

    async fn handle(&self, messages: &[QueueMessage]) -> Result<()> {
        let records: Vec<CatalogRecord> = messages
            .iter()
            .map(|m| CatalogRecord {
                message_id: m.message_id.clone(),
                body: m.body.clone(),
            })
            .collect();

        let report = self.processor.process(&records).await?;

        tracing::debug!(
            response = %serde_json::to_string(&report.response).unwrap_or_default(),
            "Catalog batch handled"
        );
        Ok(())
    }
}
