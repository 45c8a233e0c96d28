//! Storefront API Library
//!
//! HTTP surface of the storefront: catalog endpoints, the signed upload URL endpoint and
//! the Basic authorizer.

mod handlers;

pub mod auth;
pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
