use super::CatalogStore;
use crate::db::transaction::TransactionGuard;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use storefront_core::{AppError, Product, ProductWithStock, Stock};

/// Catalog store backed by the `products` and `stocks` tables.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    #[tracing::instrument(skip(self), fields(db.table = "products", db.operation = "select"))]
    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<Postgres, Product>(
            "SELECT id, title, description, price FROM products ORDER BY title ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    #[tracing::instrument(skip(self), fields(db.table = "stocks", db.operation = "select"))]
    async fn list_stocks(&self) -> Result<Vec<Stock>, AppError> {
        let stocks =
            sqlx::query_as::<Postgres, Stock>("SELECT product_id, count FROM stocks")
                .fetch_all(&self.pool)
                .await?;

        Ok(stocks)
    }

    #[tracing::instrument(skip(self), fields(db.table = "products", db.operation = "select", db.record_id = %id))]
    async fn find_product(&self, id: &str) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<Postgres, Product>(
            "SELECT id, title, description, price FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    #[tracing::instrument(skip(self), fields(db.table = "stocks", db.operation = "select", db.record_id = %product_id))]
    async fn find_stock(&self, product_id: &str) -> Result<Option<Stock>, AppError> {
        let stock = sqlx::query_as::<Postgres, Stock>(
            "SELECT product_id, count FROM stocks WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stock)
    }

    #[tracing::instrument(skip(self, product), fields(db.table = "products,stocks", db.operation = "insert", db.record_id = %product.id))]
    async fn create_product_with_stock(&self, product: &ProductWithStock) -> Result<(), AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await?;

        sqlx::query("INSERT INTO products (id, title, description, price) VALUES ($1, $2, $3, $4)")
            .bind(&product.id)
            .bind(&product.title)
            .bind(&product.description)
            .bind(product.price)
            .execute(tx.conn()?)
            .await?;

        sqlx::query("INSERT INTO stocks (product_id, count) VALUES ($1, $2)")
            .bind(&product.id)
            .bind(product.count)
            .execute(tx.conn()?)
            .await?;

        tx.commit().await
    }

    #[tracing::instrument(skip(self, product), fields(db.table = "products", db.operation = "upsert", db.record_id = %product.id))]
    async fn put_product(&self, product: &Product) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, title, description, price)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET title = EXCLUDED.title, description = EXCLUDED.description, price = EXCLUDED.price
            "#,
        )
        .bind(&product.id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, stock), fields(db.table = "stocks", db.operation = "upsert", db.record_id = %stock.product_id))]
    async fn put_stock(&self, stock: &Stock) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO stocks (product_id, count)
            VALUES ($1, $2)
            ON CONFLICT (product_id) DO UPDATE SET count = EXCLUDED.count
            "#,
        )
        .bind(&stock.product_id)
        .bind(stock.count)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "products,stocks", db.operation = "delete"))]
    async fn clear(&self) -> Result<(), AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await?;

        let stocks = sqlx::query("DELETE FROM stocks")
            .execute(tx.conn()?)
            .await?
            .rows_affected();
        let products = sqlx::query("DELETE FROM products")
            .execute(tx.conn()?)
            .await?
            .rows_affected();

        tx.commit().await?;

        tracing::info!(products, stocks, "Catalog cleared");
        Ok(())
    }
}
