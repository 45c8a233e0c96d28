use std::sync::Arc;

use anyhow::Result;
use storefront_core::{CatalogStoreKind, Config};

use super::catalog::{CatalogStore, InMemoryCatalogStore, PgCatalogStore};
use super::pool::{connect, run_migrations};

/// Create the catalog store selected by `CATALOG_STORE`.
///
/// With `migrate` set, pending migrations are applied before the store is returned.
pub async fn create_catalog_store(config: &Config, migrate: bool) -> Result<Arc<dyn CatalogStore>> {
    match config.catalog_store() {
        CatalogStoreKind::Postgres => {
            let pool = connect(config).await?;
            if migrate {
                run_migrations(&pool).await?;
            }
            Ok(Arc::new(PgCatalogStore::new(pool)))
        }
        CatalogStoreKind::Memory => {
            tracing::warn!("Using the in-memory catalog store; data is lost on exit");
            Ok(Arc::new(InMemoryCatalogStore::new()))
        }
    }
}
