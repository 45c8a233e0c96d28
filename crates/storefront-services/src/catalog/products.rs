//! Product service backing the catalog HTTP API.

use std::collections::HashMap;
use std::sync::Arc;

use storefront_core::{validation, AppError, ProductWithStock};
use storefront_db::CatalogStore;

const PRODUCT_NOT_FOUND: &str = "Product not found";

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn CatalogStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Every product merged with its stock count. Products without a stock row report 0.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ProductWithStock>, AppError> {
        let products = self.store.list_products().await?;
        let stocks: HashMap<String, i64> = self
            .store
            .list_stocks()
            .await?
            .into_iter()
            .map(|s| (s.product_id, s.count))
            .collect();

        Ok(products
            .into_iter()
            .map(|product| {
                let count = stocks.get(&product.id).copied().unwrap_or(0);
                ProductWithStock::from_parts(product, count)
            })
            .collect())
    }

    /// A product and its stock. Missing either one is a not-found.
    #[tracing::instrument(skip(self))]
    pub async fn find(&self, id: &str) -> Result<ProductWithStock, AppError> {
        if id.trim().is_empty() {
            return Err(AppError::Validation("Product ID is required".to_string()));
        }

        let product = self
            .store
            .find_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))?;

        let stock = self.store.find_stock(id).await?.ok_or_else(|| {
            tracing::warn!(product_id = %id, "Product has no stock row");
            AppError::NotFound(PRODUCT_NOT_FOUND.to_string())
        })?;

        Ok(ProductWithStock::from_parts(product, stock.count))
    }

    /// Validate a raw request body and write the product and its stock in one transaction.
    #[tracing::instrument(skip(self, body))]
    pub async fn create(&self, body: Option<&str>) -> Result<ProductWithStock, AppError> {
        let new_product = validation::validate_create_request(body)?;
        let product = new_product.into_product();

        self.store.create_product_with_stock(&product).await?;

        tracing::info!(product_id = %product.id, title = %product.title, "Product created");
        Ok(product)
    }
}
