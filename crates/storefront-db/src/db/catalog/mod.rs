//! Catalog store: products and stock levels.
//!
//! Two write paths exist on purpose. [`CatalogStore::create_product_with_stock`] writes both
//! rows in one transaction and backs the create-product endpoint. [`CatalogStore::put_product`]
//! and [`CatalogStore::put_stock`] are independent writes used by the queue consumer, so a
//! failure between them can leave a product without stock.

mod memory;
mod postgres;

pub use memory::InMemoryCatalogStore;
pub use postgres::PgCatalogStore;

use async_trait::async_trait;
use storefront_core::{AppError, Product, ProductWithStock, Stock};

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, AppError>;

    async fn list_stocks(&self) -> Result<Vec<Stock>, AppError>;

    async fn find_product(&self, id: &str) -> Result<Option<Product>, AppError>;

    async fn find_stock(&self, product_id: &str) -> Result<Option<Stock>, AppError>;

    /// Insert a product and its stock row atomically.
    ///
    /// An id collision or a serialization failure is reported as
    /// `AppError::TransactionConflict` and leaves no rows behind.
    async fn create_product_with_stock(&self, product: &ProductWithStock) -> Result<(), AppError>;

    /// Write a product row on its own.
    async fn put_product(&self, product: &Product) -> Result<(), AppError>;

    /// Write a stock row on its own.
    async fn put_stock(&self, stock: &Stock) -> Result<(), AppError>;

    /// Delete every stock and product row.
    async fn clear(&self) -> Result<(), AppError>;
}
