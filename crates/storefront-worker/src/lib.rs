//! Storefront Worker
//!
//! Long-running pollers standing in for the hosting platform's event invocation:
//! - upload-events queue: bucket notifications handed to the import pipeline
//! - catalog queue: catalog messages handed to the batch consumer in bounded batches

pub mod context;
pub mod handlers;
pub mod poller;

pub use context::BatchHandler;
pub use handlers::{CatalogBatchHandler, UploadEventHandler};
pub use poller::{PollOutcome, PollerConfig, PollerHandle, QueuePoller};
