//! Storage setup and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use storefront_core::{Config, StorageBackend};
use storefront_storage::{create_storage, Storage};

/// Create the bucket client. Only the S3 backend can sign upload URLs.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage")?;
    let backend_type = storage.backend_type();
    tracing::info!(backend = %backend_type, "Storage abstraction initialized successfully");

    if backend_type != StorageBackend::S3 {
        tracing::warn!(
            backend = %backend_type,
            "Storage backend cannot sign upload URLs; GET /import will fail"
        );
    }

    Ok(storage)
}
