//! Catalog API integration tests.
//!
//! Run with: `cargo test -p storefront-api --test products_test`

mod helpers;

use helpers::setup_test_app;
use serde_json::{json, Value};
use storefront_core::{Product, Stock};
use storefront_db::CatalogStore;

#[tokio::test]
async fn test_get_unknown_product_is_404() {
    let app = setup_test_app();

    let response = app.client().get("/products/does-not-exist").await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(
        response.json::<Value>(),
        json!({"message": "Product not found"})
    );
}

#[tokio::test]
async fn test_create_missing_price_is_400_and_writes_nothing() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/products")
        .json(&json!({"title": "Lamp", "description": "Desk lamp", "count": 3}))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.json::<Value>()["message"],
        "Missing required fields. Please provide title, description, price, and count."
    );
    assert_eq!(app.store.product_count(), 0);
    assert_eq!(app.store.stock_count(), 0);
}

#[tokio::test]
async fn test_create_then_read_back() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/products")
        .json(&json!({"title": "Lamp", "description": "Desk lamp", "price": 24.5, "count": 3}))
        .await;
    assert_eq!(response.status_code(), 201);
    let created: Value = response.json();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["count"], 3);

    let found: Value = app.client().get(&format!("/products/{}", id)).await.json();
    assert_eq!(found, created);

    let listed: Value = app.client().get("/products").await.json();
    assert_eq!(listed, json!([created]));
}

#[tokio::test]
async fn test_create_body_errors() {
    let app = setup_test_app();

    let empty = app.client().post("/products").await;
    assert_eq!(empty.status_code(), 400);
    assert_eq!(empty.json::<Value>()["message"], "Request body is missing");

    let malformed = app.client().post("/products").text("{title:").await;
    assert_eq!(malformed.status_code(), 400);
    assert_eq!(
        malformed.json::<Value>()["message"],
        "Invalid JSON in request body"
    );

    let mistyped = app
        .client()
        .post("/products")
        .json(&json!({"title": "Lamp", "description": "Desk lamp", "price": "cheap", "count": 3}))
        .await;
    assert_eq!(mistyped.status_code(), 400);
    assert_eq!(
        mistyped.json::<Value>()["message"],
        "Invalid data types. Title and description must be strings, price and count must be numbers."
    );
}

#[tokio::test]
async fn test_list_reports_missing_stock_as_zero() {
    let app = setup_test_app();
    app.store
        .put_product(&Product {
            id: "p-1".to_string(),
            title: "Orphan".to_string(),
            description: String::new(),
            price: 12.0,
        })
        .await
        .unwrap();
    app.store
        .put_product(&Product {
            id: "p-2".to_string(),
            title: "Stocked".to_string(),
            description: String::new(),
            price: 8.0,
        })
        .await
        .unwrap();
    app.store
        .put_stock(&Stock {
            product_id: "p-2".to_string(),
            count: 7,
        })
        .await
        .unwrap();

    let listed: Vec<Value> = app.client().get("/products").await.json();
    let count_of = |id: &str| {
        listed
            .iter()
            .find(|p| p["id"] == id)
            .map(|p| p["count"].clone())
    };
    assert_eq!(count_of("p-1"), Some(json!(0)));
    assert_eq!(count_of("p-2"), Some(json!(7)));

    // By id, a product without stock is not found.
    assert_eq!(app.client().get("/products/p-1").await.status_code(), 404);
}

#[tokio::test]
async fn test_store_outage_is_500_with_generic_message() {
    let app = setup_test_app();
    app.store.set_unavailable(true);

    let response = app.client().get("/products").await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(response.json::<Value>()["message"], "Internal server error");
}

#[tokio::test]
async fn test_responses_carry_cors_headers() {
    let app = setup_test_app();

    let ok = app
        .client()
        .get("/products")
        .add_header("Origin", "https://shop.example.com")
        .await;
    assert_eq!(
        ok.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );

    let not_found = app
        .client()
        .get("/products/missing")
        .add_header("Origin", "https://shop.example.com")
        .await;
    assert_eq!(not_found.status_code(), 404);
    assert_eq!(
        not_found
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()["status"], "healthy");
}
