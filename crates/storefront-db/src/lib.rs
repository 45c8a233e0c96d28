//! Storefront Database Layer
//!
//! This crate provides the catalog store (products and their stock levels) and the
//! database connection and transaction utilities.
//!
// Module declarations
pub mod db;

// Re-exports: Catalog store and implementations
pub use db::catalog::{CatalogStore, InMemoryCatalogStore, PgCatalogStore};

// Re-exports: Pool setup and store selection
pub use db::factory::create_catalog_store;
pub use db::pool::{connect, run_migrations};

// Re-exports: Transaction utilities
pub use db::transaction::TransactionGuard;
