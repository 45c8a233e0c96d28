//! Service initialization

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use storefront_core::Config;
use storefront_db::CatalogStore;
use storefront_services::ProductService;
use storefront_storage::Storage;

use crate::auth::BasicAuthorizer;
use crate::state::AppState;

/// Assemble the application state from already constructed clients.
pub fn initialize_services(
    config: &Config,
    store: Arc<dyn CatalogStore>,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let authorizer = BasicAuthorizer::new(config.auth_username(), config.auth_password());

    let state = AppState {
        config: config.clone(),
        products: ProductService::new(store),
        storage,
        authorizer: Arc::new(authorizer),
        import_url_expiry: Duration::from_secs(config.import_url_expiry_secs()),
    };

    tracing::info!(
        catalog_store = %config.catalog_store(),
        import_url_expiry_secs = config.import_url_expiry_secs(),
        "Services initialized"
    );

    Ok(Arc::new(state))
}
