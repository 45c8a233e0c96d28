//! Database transaction utilities

use storefront_core::AppError;
use sqlx::{PgPool, Postgres, Transaction};

/// A transaction that is rolled back unless [`TransactionGuard::commit`] is called.
///
/// Errors keep their SQLSTATE so unique and serialization failures surface as
/// `AppError::TransactionConflict`.
///
/// # Example
///
/// ```ignore
/// use storefront_db::TransactionGuard;
///
/// async fn example(pool: &sqlx::PgPool) -> Result<(), storefront_core::AppError> {
///     let mut tx = TransactionGuard::begin(pool).await?;
///     sqlx::query("INSERT INTO ...").execute(tx.conn()).await?;
///     tx.commit().await
/// }
/// ```
pub struct TransactionGuard<'a> {
    transaction: Option<Transaction<'a, Postgres>>,
}

impl<'a> TransactionGuard<'a> {
    /// Begin a new database transaction
    pub async fn begin(pool: &'a PgPool) -> Result<Self, AppError> {
        let transaction = pool.begin().await?;
        Ok(Self {
            transaction: Some(transaction),
        })
    }

    /// Connection to run statements on inside the transaction.
    pub fn conn(&mut self) -> Result<&mut sqlx::PgConnection, AppError> {
        self.transaction
            .as_deref_mut()
            .ok_or_else(|| AppError::Internal("Transaction already finished".to_string()))
    }

    /// Commit the transaction
    pub async fn commit(mut self) -> Result<(), AppError> {
        if let Some(tx) = self.transaction.take() {
            tx.commit().await?;
        }
        Ok(())
    }

    /// Roll the transaction back explicitly.
    pub async fn rollback(mut self) -> Result<(), AppError> {
        if let Some(tx) = self.transaction.take() {
            tx.rollback().await?;
        }
        Ok(())
    }
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        // sqlx rolls back a dropped transaction when its connection returns to the pool.
        if self.transaction.is_some() {
            tracing::warn!("Transaction dropped without commit - rolling back");
        }
    }
}
