//! Catalog batch consumer
//!
//! Each delivered message is handled on its own, in order: decode, validate, write the product,
//! write its stock, publish a product-created notification. A message that fails any step is
//! logged and skipped; the batch as a whole still succeeds. Only failures outside the
//! per-message loop fail the invocation, after a best-effort failure notification.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use storefront_core::{
    constants::{BATCH_FAILURE_SUBJECT, BATCH_SUCCESS_MESSAGE, CATALOG_BATCH_SIZE},
    validation, AppError, Notification, ProductWithStock,
};
use storefront_db::CatalogStore;
use storefront_infra::{NotificationPublisher, TopicMessage};

/// One delivered queue message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogRecord {
    #[serde(rename = "messageId", default)]
    pub message_id: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct BatchEvent {
    #[serde(rename = "Records")]
    records: Vec<CatalogRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResponseBody {
    pub message: String,
}

/// What the invocation reports back to the platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: BatchResponseBody,
}

impl BatchResponse {
    fn processed() -> Self {
        BatchResponse {
            status_code: 200,
            body: BatchResponseBody {
                message: BATCH_SUCCESS_MESSAGE.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub response: BatchResponse,
    pub created: Vec<ProductWithStock>,
    /// Undecodable or invalid messages.
    pub rejected: usize,
    /// Messages whose product or stock write failed.
    pub failed: usize,
    /// Products persisted but not announced.
    pub notify_failures: usize,
}

#[derive(Clone)]
pub struct CatalogBatchProcessor {
    store: Arc<dyn CatalogStore>,
    publisher: Arc<dyn NotificationPublisher>,
    max_batch_size: usize,
}

impl CatalogBatchProcessor {
    pub fn new(store: Arc<dyn CatalogStore>, publisher: Arc<dyn NotificationPublisher>) -> Self {
        Self {
            store,
            publisher,
            max_batch_size: CATALOG_BATCH_SIZE,
        }
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Process a raw platform event of the form `{"Records":[{"messageId":…,"body":…}]}`.
    pub async fn process_event(&self, raw: &str) -> Result<BatchReport, AppError> {
        match serde_json::from_str::<BatchEvent>(raw) {
            Ok(event) => self.process(&event.records).await,
            Err(e) => {
                let err = AppError::Validation(format!("Undecodable batch event: {}", e));
                self.report_failure(&err).await;
                Err(err)
            }
        }
    }

    #[tracing::instrument(skip(self, records), fields(batch_size = records.len()))]
    pub async fn process(&self, records: &[CatalogRecord]) -> Result<BatchReport, AppError> {
        if records.len() > self.max_batch_size {
            let err = AppError::Validation(format!(
                "Batch of {} messages exceeds the limit of {}",
                records.len(),
                self.max_batch_size
            ));
            self.report_failure(&err).await;
            return Err(err);
        }

        let mut report = BatchReport {
            response: BatchResponse::processed(),
            created: Vec::new(),
            rejected: 0,
            failed: 0,
            notify_failures: 0,
        };

        for record in records {
            let new_product = match serde_json::from_str::<Value>(&record.body)
                .map_err(AppError::from)
                .and_then(|value| validation::validate_catalog_message(&value))
            {
                Ok(new_product) => new_product,
                Err(e) => {
                    report.rejected += 1;
                    tracing::warn!(
                        error = %e,
                        message_id = %record.message_id,
                        body = %record.body,
                        "Skipping invalid catalog message"
                    );
                    continue;
                }
            };

            let product = new_product.into_product();

            if let Err(e) = self.store.put_product(&product.product()).await {
                report.failed += 1;
                tracing::error!(
                    error = %e,
                    message_id = %record.message_id,
                    body = %record.body,
                    "Failed to write product"
                );
                continue;
            }

            if let Err(e) = self.store.put_stock(&product.stock()).await {
                report.failed += 1;
                tracing::error!(
                    error = %e,
                    message_id = %record.message_id,
                    product_id = %product.id,
                    "Failed to write stock; product left without stock"
                );
                continue;
            }

            if let Err(e) = self.notify_created(&product).await {
                report.notify_failures += 1;
                tracing::warn!(
                    error = %e,
                    product_id = %product.id,
                    "Failed to publish product notification"
                );
            }

            report.created.push(product);
        }

        tracing::info!(
            created = report.created.len(),
            rejected = report.rejected,
            failed = report.failed,
            notify_failures = report.notify_failures,
            "Catalog batch processed"
        );

        Ok(report)
    }

    async fn notify_created(&self, product: &ProductWithStock) -> Result<(), AppError> {
        let notification = Notification::product_created(product.clone());
        let message = TopicMessage::from_notification(&notification)?;
        self.publisher.publish(&message).await?;
        Ok(())
    }

    async fn report_failure(&self, err: &AppError) {
        let message = TopicMessage::plain(BATCH_FAILURE_SUBJECT, json!({ "error": err.to_string() }));
        if let Err(publish_err) = self.publisher.publish(&message).await {
            tracing::error!(
                error = %publish_err,
                batch_error = %err,
                "Failed to publish batch failure notification"
            );
        }
    }
}
