//! Upload event handler
//!
//! For each object named in a bucket event: skip keys outside `uploaded/`, download and parse
//! the CSV, enqueue one catalog message per row, then move the file to `parsed/`.

use std::sync::Arc;

use serde::Serialize;
use storefront_core::{constants::IMPORT_SUCCESS_MESSAGE, AppError};
use storefront_infra::MessageQueue;
use storefront_storage::{keys, Storage, StorageError};

use super::dispatcher::{DispatchSummary, RecordDispatcher};
use super::event::S3Event;
use super::mover::{FileMover, MoveOutcome};
use super::parser::CsvRowParser;

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectReport {
    /// Key outside the upload prefix; nothing was read, sent or moved.
    Skipped { key: String },
    /// The object no longer exists, usually because a redelivered event was already handled.
    Missing { key: String },
    Imported {
        key: String,
        dispatch: DispatchSummary,
        moved: MoveOutcome,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
    #[serde(skip)]
    pub objects: Vec<ObjectReport>,
}

#[derive(Clone)]
pub struct ImportFileParser {
    storage: Arc<dyn Storage>,
    dispatcher: RecordDispatcher,
    mover: FileMover,
}

impl ImportFileParser {
    pub fn new(storage: Arc<dyn Storage>, queue: Arc<dyn MessageQueue>) -> Self {
        Self {
            dispatcher: RecordDispatcher::new(queue),
            mover: FileMover::new(storage.clone()),
            storage,
        }
    }

    /// Handle every record of an event in order. The first failing object aborts the event.
    #[tracing::instrument(skip(self, event), fields(records = event.records.len()))]
    pub async fn handle_event(&self, event: &S3Event) -> Result<ImportReport, AppError> {
        let mut objects = Vec::with_capacity(event.records.len());

        for record in &event.records {
            let report = self.process_object(&record.s3.object.key).await.map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %record.s3.bucket.name,
                    key = %record.s3.object.key,
                    "Import failed"
                );
                e
            })?;
            objects.push(report);
        }

        Ok(ImportReport {
            status_code: 200,
            body: IMPORT_SUCCESS_MESSAGE.to_string(),
            objects,
        })
    }

    pub async fn process_object(&self, raw_key: &str) -> Result<ObjectReport, AppError> {
        let key = keys::decode_event_key(raw_key)?;

        if !keys::is_incoming(&key) {
            tracing::info!(key = %key, "Ignoring object outside the upload prefix");
            return Ok(ObjectReport::Skipped { key });
        }

        let start = std::time::Instant::now();

        let body = match self.storage.download(&key).await {
            Ok(body) => body,
            Err(StorageError::NotFound(_)) => {
                tracing::warn!(key = %key, "Uploaded object no longer exists");
                return Ok(ObjectReport::Missing { key });
            }
            Err(e) => return Err(e.into()),
        };

        // Every row must parse before any row is sent.
        let rows = CsvRowParser::from_body(&key, &body)?.collect::<Result<Vec<_>, _>>()?;
        let dispatch = self.dispatcher.dispatch_all(&key, &rows).await;
        let moved = self.mover.move_to_done(&key).await?;

        tracing::info!(
            key = %key,
            rows = dispatch.rows,
            sent = dispatch.sent,
            destination = %moved.destination(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Import completed"
        );

        Ok(ObjectReport::Imported {
            key,
            dispatch,
            moved,
        })
    }
}
