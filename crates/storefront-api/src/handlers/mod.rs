pub mod authorize;
pub mod health;
pub mod import;
pub mod products;
