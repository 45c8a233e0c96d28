//! Per-record dispatcher
//!
//! Converts each parsed row to a [`CatalogMessage`] and enqueues it on its own. A failed send
//! is logged and counted, then the next row is attempted.

use std::sync::Arc;

use storefront_core::{AppError, CatalogMessage};
use storefront_infra::MessageQueue;

use super::parser::CsvRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub rows: usize,
    pub sent: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct RecordDispatcher {
    queue: Arc<dyn MessageQueue>,
}

impl RecordDispatcher {
    pub fn new(queue: Arc<dyn MessageQueue>) -> Self {
        Self { queue }
    }

    /// Normalise one row. Missing or non-numeric `price`/`count` become `None`.
    pub fn to_message(record: &CsvRecord) -> CatalogMessage {
        CatalogMessage {
            title: record.get("title").cloned(),
            description: record.get("description").cloned(),
            price: coerce_number(record.get("price")),
            count: coerce_number(record.get("count")),
        }
    }

    /// Enqueue a single row.
    pub async fn dispatch(&self, record: &CsvRecord) -> Result<(), AppError> {
        let message = Self::to_message(record);
        let body = serde_json::to_string(&message)?;
        self.queue.send(&body).await?;
        Ok(())
    }

    /// Dispatch every row in order. Send failures are isolated per row.
    pub async fn dispatch_all(&self, key: &str, records: &[CsvRecord]) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        for record in records {
            summary.rows += 1;

            match self.dispatch(record).await {
                Ok(()) => summary.sent += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(
                        error = %e,
                        key = %key,
                        row = summary.rows,
                        record = ?record,
                        "Failed to enqueue catalog record"
                    );
                }
            }
        }

        tracing::info!(
            key = %key,
            rows = summary.rows,
            sent = summary.sent,
            failed = summary.failed,
            "Dispatched catalog records"
        );

        summary
    }
}

fn coerce_number(raw: Option<&String>) -> Option<f64> {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}
