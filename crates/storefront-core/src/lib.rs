//! Storefront Core Library
//!
//! This crate provides core domain models, error types, configuration, and validation
//! that are shared across all Storefront components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, Config, StorefrontConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    CatalogMessage, NewProduct, Notification, Product, ProductWithStock, Stock,
};
pub use storage_types::{CatalogStoreKind, StorageBackend};
