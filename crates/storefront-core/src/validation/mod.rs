//! Validation modules

pub mod product;

pub use product::{
    validate_catalog_message, validate_create_request, INVALID_JSON, INVALID_TYPES,
    MISSING_BODY, MISSING_FIELDS,
};
