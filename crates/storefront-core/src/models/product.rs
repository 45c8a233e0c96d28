use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog product. Never mutated in place once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
}

/// Stock level for a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Stock {
    pub product_id: String,
    pub count: i64,
}

/// Product merged with its stock count, as returned by the catalog API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWithStock {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub count: i64,
}

impl ProductWithStock {
    pub fn from_parts(product: Product, count: i64) -> Self {
        ProductWithStock {
            id: product.id,
            title: product.title,
            description: product.description,
            price: product.price,
            count,
        }
    }

    pub fn product(&self) -> Product {
        Product {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price,
        }
    }

    pub fn stock(&self) -> Stock {
        Stock {
            product_id: self.id.clone(),
            count: self.count,
        }
    }
}

/// Validated input for a product that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub count: i64,
}

impl NewProduct {
    /// Assign a fresh random id.
    pub fn into_product(self) -> ProductWithStock {
        ProductWithStock {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            description: self.description,
            price: self.price,
            count: self.count,
        }
    }
}
