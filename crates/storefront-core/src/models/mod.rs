//! Data models for the application
//!
//! Catalog rows, the queue message that carries one imported CSV row, and the
//! notification published once a queued product has been persisted.

mod catalog_message;
mod notification;
mod product;

pub use catalog_message::*;
pub use notification::*;
pub use product::*;
