//! Catalog services

pub mod batch;
pub mod products;

pub use batch::{BatchReport, BatchResponse, BatchResponseBody, CatalogBatchProcessor, CatalogRecord};
pub use products::ProductService;
