//! Application state shared by every handler.

use std::sync::Arc;
use std::time::Duration;

use storefront_core::Config;
use storefront_services::ProductService;
use storefront_storage::Storage;

use crate::auth::BasicAuthorizer;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub products: ProductService,
    pub storage: Arc<dyn Storage>,
    pub authorizer: Arc<BasicAuthorizer>,
    /// Lifetime of signed upload URLs.
    pub import_url_expiry: Duration,
}
