//! Storefront Storage Library
//!
//! Storage abstraction over the import bucket, with an S3 backend and a local filesystem
//! backend.
//!
//! # Storage key format
//!
//! - **Incoming uploads**: `uploaded/{file_name}`
//! - **Parsed files**: `parsed/{file_name}`
//!
//! Keys must not contain `..` or a leading `/`. Key derivation lives in the `keys` module so
//! the upload endpoint, the import pipeline and every backend agree on the layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use storefront_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
