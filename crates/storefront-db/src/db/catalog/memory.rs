use super::CatalogStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use storefront_core::{AppError, Product, ProductWithStock, Stock};

#[derive(Default)]
struct Tables {
    // Insertion order is the listing order.
    products: Vec<Product>,
    stocks: HashMap<String, i64>,
}

/// Process-local catalog store for development and tests.
///
/// Stock writes can be made to fail, which reproduces the half-written state the queue
/// consumer may leave behind.
#[derive(Default)]
pub struct InMemoryCatalogStore {
    tables: Mutex<Tables>,
    fail_stock_writes: AtomicBool,
    unavailable: AtomicBool,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `put_stock` calls fail.
    pub fn fail_stock_writes(&self, fail: bool) {
        self.fail_stock_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn product_count(&self) -> usize {
        self.lock().map(|t| t.products.len()).unwrap_or(0)
    }

    pub fn stock_count(&self) -> usize {
        self.lock().map(|t| t.stocks.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Tables>, AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::TransientDependency(
                "Catalog store unavailable".to_string(),
            ));
        }
        self.tables
            .lock()
            .map_err(|_| AppError::Internal("Catalog store lock poisoned".to_string()))
    }
}

fn upsert_product(tables: &mut Tables, product: &Product) {
    match tables.products.iter_mut().find(|p| p.id == product.id) {
        Some(existing) => *existing = product.clone(),
        None => tables.products.push(product.clone()),
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.lock()?.products.clone())
    }

    async fn list_stocks(&self) -> Result<Vec<Stock>, AppError> {
        Ok(self
            .lock()?
            .stocks
            .iter()
            .map(|(product_id, count)| Stock {
                product_id: product_id.clone(),
                count: *count,
            })
            .collect())
    }

    async fn find_product(&self, id: &str) -> Result<Option<Product>, AppError> {
        Ok(self.lock()?.products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_stock(&self, product_id: &str) -> Result<Option<Stock>, AppError> {
        Ok(self.lock()?.stocks.get(product_id).map(|count| Stock {
            product_id: product_id.to_string(),
            count: *count,
        }))
    }

    async fn create_product_with_stock(&self, product: &ProductWithStock) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        if tables.products.iter().any(|p| p.id == product.id)
            || tables.stocks.contains_key(&product.id)
        {
            return Err(AppError::TransactionConflict(format!(
                "Product {} already exists",
                product.id
            )));
        }
        tables.products.push(product.product());
        tables.stocks.insert(product.id.clone(), product.count);
        Ok(())
    }

    async fn put_product(&self, product: &Product) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        upsert_product(&mut tables, product);
        Ok(())
    }

    async fn put_stock(&self, stock: &Stock) -> Result<(), AppError> {
        if self.fail_stock_writes.load(Ordering::SeqCst) {
            return Err(AppError::TransientDependency(format!(
                "Stock write rejected for {}",
                stock.product_id
            )));
        }
        let mut tables = self.lock()?;
        if stock.count < 0 {
            return Err(AppError::Validation(
                "Stock count must not be negative".to_string(),
            ));
        }
        tables.stocks.insert(stock.product_id.clone(), stock.count);
        Ok(())
    }

    async fn clear(&self) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        tables.products.clear();
        tables.stocks.clear();
        Ok(())
    }
}
