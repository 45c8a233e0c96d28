use serde::Serialize;

use super::ProductWithStock;

/// Published once per product persisted from the catalog queue.
///
/// Only `message` and `product` form the body; `price_attribute` travels as a numeric message
/// attribute so subscriptions can filter on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub message: String,
    pub product: ProductWithStock,
    #[serde(skip)]
    pub price_attribute: f64,
}

impl Notification {
    pub fn product_created(product: ProductWithStock) -> Self {
        Notification {
            message: format!("Product created: {}", product.title),
            price_attribute: product.price,
            product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_created_body() {
        let product = ProductWithStock {
            id: "p-1".to_string(),
            title: "Test".to_string(),
            description: "d".to_string(),
            price: 100.0,
            count: 10,
        };
        let notification = Notification::product_created(product);
        assert_eq!(notification.price_attribute, 100.0);

        let body = serde_json::to_value(&notification).unwrap();
        assert_eq!(body["message"], "Product created: Test");
        assert_eq!(body["product"]["count"], 10);
        assert!(body.get("price_attribute").is_none());
    }
}
