//! Storefront Services Layer
//!
//! Business services between the transports (HTTP, queue workers) and the stores:
//! - the CSV import pipeline: parse an uploaded file, enqueue one message per row, move the
//!   file out of the upload prefix
//! - the catalog services: product create/list/find and the queue batch consumer

pub mod catalog;
pub mod import;

pub use catalog::{BatchReport, BatchResponse, CatalogBatchProcessor, CatalogRecord, ProductService};
pub use import::{
    CsvRecord, CsvRowParser, DispatchSummary, FileMover, ImportFileParser, ImportReport,
    MoveOutcome, ObjectReport, RecordDispatcher, S3Event,
};
