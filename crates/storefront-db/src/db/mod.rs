//! Database repositories for data access layer
//
// Catalog store (products, stocks)
pub mod catalog;
//
// Store selection from configuration
pub mod factory;
//
// Connection pool and migrations
pub mod pool;
//
// Transaction utilities
pub mod transaction;
