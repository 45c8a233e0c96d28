//! Product input validation
//!
//! Two entry points share the same field rules:
//! - the synchronous create path, which reports the first failing rule as a client message
//! - the queue path, which validates one decoded catalog message at a time

use serde_json::{Map, Number, Value};

use crate::error::AppError;
use crate::models::NewProduct;

pub const MISSING_BODY: &str = "Request body is missing";
pub const INVALID_JSON: &str = "Invalid JSON in request body";
pub const MISSING_FIELDS: &str =
    "Missing required fields. Please provide title, description, price, and count.";
pub const INVALID_TYPES: &str =
    "Invalid data types. Title and description must be strings, price and count must be numbers.";
const INVALID_COUNT: &str = "Count must be a non-negative integer.";
const INVALID_PRICE: &str = "Price must be a finite number.";

/// Validate the raw body of a create-product request.
pub fn validate_create_request(body: Option<&str>) -> Result<NewProduct, AppError> {
    let body = match body {
        Some(body) if !body.trim().is_empty() => body,
        _ => return Err(AppError::Validation(MISSING_BODY.to_string())),
    };

    let value: Value = serde_json::from_str(body)
        .map_err(|_| AppError::Validation(INVALID_JSON.to_string()))?;

    let fields = value
        .as_object()
        .ok_or_else(|| AppError::Validation(MISSING_FIELDS.to_string()))?;

    let title = field(fields, "title");
    let description = field(fields, "description");
    let price = field(fields, "price");
    let count = field(fields, "count");

    let (Some(title), Some(description), Some(price), Some(count)) =
        (title, description, price, count)
    else {
        return Err(AppError::Validation(MISSING_FIELDS.to_string()));
    };

    if is_empty_string(title) || is_empty_string(description) {
        return Err(AppError::Validation(MISSING_FIELDS.to_string()));
    }

    let (Value::String(title), Value::String(description), Value::Number(price), Value::Number(count)) =
        (title, description, price, count)
    else {
        return Err(AppError::Validation(INVALID_TYPES.to_string()));
    };

    let price = finite_price(price).ok_or_else(|| AppError::Validation(INVALID_PRICE.to_string()))?;
    let count =
        non_negative_count(count).ok_or_else(|| AppError::Validation(INVALID_COUNT.to_string()))?;

    Ok(NewProduct {
        title: title.clone(),
        description: description.clone(),
        price,
        count,
    })
}

/// Validate one decoded catalog queue message.
///
/// The title must be a non-empty string, the price a finite number and the count a
/// non-negative integral number, all three together. A missing or non-string description
/// becomes the empty string.
pub fn validate_catalog_message(value: &Value) -> Result<NewProduct, AppError> {
    let fields = value
        .as_object()
        .ok_or_else(|| AppError::Validation("Catalog message must be a JSON object".to_string()))?;

    let title = match field(fields, "title") {
        Some(Value::String(title)) if !title.trim().is_empty() => title.clone(),
        _ => {
            return Err(AppError::Validation(
                "Catalog message title must be a non-empty string".to_string(),
            ))
        }
    };

    let price = match field(fields, "price") {
        Some(Value::Number(price)) => finite_price(price),
        _ => None,
    }
    .ok_or_else(|| AppError::Validation(INVALID_PRICE.to_string()))?;

    let count = match field(fields, "count") {
        Some(Value::Number(count)) => non_negative_count(count),
        _ => None,
    }
    .ok_or_else(|| AppError::Validation(INVALID_COUNT.to_string()))?;

    let description = match field(fields, "description") {
        Some(Value::String(description)) => description.clone(),
        _ => String::new(),
    };

    Ok(NewProduct {
        title,
        description,
        price,
        count,
    })
}

/// Present and not JSON null.
fn field<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    fields.get(name).filter(|v| !v.is_null())
}

fn is_empty_string(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.is_empty())
}

fn finite_price(price: &Number) -> Option<f64> {
    price.as_f64().filter(|p| p.is_finite())
}

fn non_negative_count(count: &Number) -> Option<i64> {
    if let Some(count) = count.as_i64() {
        return (count >= 0).then_some(count);
    }
    if count.is_u64() {
        // Above i64::MAX.
        return None;
    }
    let count = count.as_f64()?;
    if count.is_finite() && count >= 0.0 && count.fract() == 0.0 && count < i64::MAX as f64 {
        Some(count as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_create_request_valid() {
        let product = validate_create_request(Some(
            r#"{"title":"Lamp","description":"Desk lamp","price":24.5,"count":3}"#,
        ))
        .unwrap();
        assert_eq!(product.title, "Lamp");
        assert_eq!(product.price, 24.5);
        assert_eq!(product.count, 3);
    }

    #[test]
    fn test_create_request_missing_body() {
        assert_eq!(message(validate_create_request(None).unwrap_err()), MISSING_BODY);
        assert_eq!(
            message(validate_create_request(Some("  ")).unwrap_err()),
            MISSING_BODY
        );
    }

    #[test]
    fn test_create_request_invalid_json() {
        assert_eq!(
            message(validate_create_request(Some("{title:")).unwrap_err()),
            INVALID_JSON
        );
    }

    #[test]
    fn test_create_request_missing_price() {
        let err = validate_create_request(Some(
            r#"{"title":"Lamp","description":"Desk lamp","count":3}"#,
        ))
        .unwrap_err();
        assert_eq!(message(err), MISSING_FIELDS);
    }

    #[test]
    fn test_create_request_empty_title_counts_as_missing() {
        let err = validate_create_request(Some(
            r#"{"title":"","description":"Desk lamp","price":1,"count":3}"#,
        ))
        .unwrap_err();
        assert_eq!(message(err), MISSING_FIELDS);
    }

    #[test]
    fn test_create_request_wrong_types() {
        let err = validate_create_request(Some(
            r#"{"title":"Lamp","description":"Desk lamp","price":"24.5","count":3}"#,
        ))
        .unwrap_err();
        assert_eq!(message(err), INVALID_TYPES);
    }

    #[test]
    fn test_create_request_fractional_count() {
        let err = validate_create_request(Some(
            r#"{"title":"Lamp","description":"Desk lamp","price":2,"count":1.5}"#,
        ))
        .unwrap_err();
        assert_eq!(message(err), INVALID_COUNT);

        let err = validate_create_request(Some(
            r#"{"title":"Lamp","description":"Desk lamp","price":2,"count":-1}"#,
        ))
        .unwrap_err();
        assert_eq!(message(err), INVALID_COUNT);
    }

    #[test]
    fn test_catalog_message_valid_with_float_count() {
        let product =
            validate_catalog_message(&json!({"title":"Test","price":100,"count":10.0})).unwrap();
        assert_eq!(product.description, "");
        assert_eq!(product.count, 10);
        assert_eq!(product.price, 100.0);
    }

    #[test]
    fn test_catalog_message_requires_every_field() {
        // A title alone is not enough.
        assert!(validate_catalog_message(&json!({"title":"Test"})).is_err());
        assert!(validate_catalog_message(&json!({"price":1,"count":1})).is_err());
        assert!(validate_catalog_message(&json!({"title":"Test","price":null,"count":1})).is_err());
        assert!(validate_catalog_message(&json!({"title":"Test","price":1,"count":"1"})).is_err());
        assert!(validate_catalog_message(&json!([1, 2])).is_err());
    }
}
