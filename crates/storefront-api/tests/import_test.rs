//! Signed upload URL integration tests.
//!
//! Run with: `cargo test -p storefront-api --test import_test`

mod helpers;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::config::{Credentials, SharedCredentialsProvider};
use helpers::{
    basic_auth, server_with_storage, setup_test_app, test_config, TEST_PASSWORD, TEST_USERNAME,
};
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use storefront_storage::S3Storage;

#[tokio::test]
async fn test_signed_url_for_named_file() {
    let app = setup_test_app();

    let response = app
        .client()
        .get("/import")
        .add_query_param("name", "products.csv")
        .add_header("Authorization", basic_auth(TEST_USERNAME, TEST_PASSWORD))
        .await;

    assert_eq!(response.status_code(), 200);
    let url: String = response.json();
    assert!(url.contains("uploaded/products.csv"));
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-credentials")
            .unwrap(),
        "true"
    );

    let signed = app.storage.signed();
    assert_eq!(signed.len(), 1);
    assert_eq!(signed[0].0, "uploaded/products.csv");
    assert_eq!(signed[0].1, "text/csv");
    assert_eq!(signed[0].2, Duration::from_secs(300));
}

#[tokio::test]
async fn test_missing_name_is_400() {
    let app = setup_test_app();

    for request in [
        app.client().get("/import"),
        app.client().get("/import").add_query_param("name", ""),
    ] {
        let response = request
            .add_header("Authorization", basic_auth(TEST_USERNAME, TEST_PASSWORD))
            .await;
        assert_eq!(response.status_code(), 400);
        assert_eq!(
            response.json::<Value>(),
            json!({"message": "File name is required"})
        );
    }
    assert!(app.storage.signed().is_empty());
}

#[tokio::test]
async fn test_signing_failure_is_500() {
    let app = setup_test_app();
    app.storage.fail_signing.store(true, Ordering::SeqCst);

    let response = app
        .client()
        .get("/import")
        .add_query_param("name", "products.csv")
        .add_header("Authorization", basic_auth(TEST_USERNAME, TEST_PASSWORD))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(
        response.json::<Value>(),
        json!({"message": "Error generating signed URL"})
    );
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-credentials")
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_import_requires_credentials() {
    let app = setup_test_app();

    let missing = app
        .client()
        .get("/import")
        .add_query_param("name", "products.csv")
        .await;
    assert_eq!(missing.status_code(), 401);
    assert_eq!(missing.json::<Value>()["message"], "Unauthorized");

    let wrong = app
        .client()
        .get("/import")
        .add_query_param("name", "products.csv")
        .add_header("Authorization", basic_auth(TEST_USERNAME, "guess"))
        .await;
    assert_eq!(wrong.status_code(), 403);
    assert_eq!(wrong.json::<Value>()["message"], "Forbidden");

    let garbage = app
        .client()
        .get("/import")
        .add_query_param("name", "products.csv")
        .add_header("Authorization", "Basic not-base64!")
        .await;
    assert_eq!(garbage.status_code(), 403);

    assert!(app.storage.signed().is_empty());
}

#[tokio::test]
async fn test_s3_upload_url_signs_csv_content_type() {
    let sdk_config = SdkConfig::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("eu-west-1"))
        .credentials_provider(SharedCredentialsProvider::new(Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI",
            None,
            None,
            "static",
        )))
        .build();
    let storage = S3Storage::from_sdk_config("imports".to_string(), &sdk_config, None);
    let server = server_with_storage(test_config(), Arc::new(storage));

    let response = server
        .get("/import")
        .add_query_param("name", "products.csv")
        .add_header("Authorization", basic_auth(TEST_USERNAME, TEST_PASSWORD))
        .await;

    assert_eq!(response.status_code(), 200);
    let url: String = response.json();
    assert!(url.contains("/uploaded/products.csv?"), "{url}");
    let signed_headers = url
        .split('&')
        .find_map(|pair| pair.split_once("X-Amz-SignedHeaders="))
        .map(|(_, v)| v.replace("%3B", ";"))
        .expect("signed headers in query");
    assert!(
        signed_headers.split(';').any(|h| h == "content-type"),
        "{signed_headers}"
    );
}

#[tokio::test]
async fn test_import_echoes_origin_for_credentialed_requests() {
    let app = setup_test_app();
    let origin = "https://shop.example.com";

    let response = app
        .client()
        .get("/import")
        .add_query_param("name", "products.csv")
        .add_header("Origin", origin)
        .add_header("Authorization", basic_auth(TEST_USERNAME, TEST_PASSWORD))
        .await;

    assert_eq!(response.status_code(), 200);
    let headers = response.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), origin);
    assert_eq!(headers.get("access-control-allow-credentials").unwrap(), "true");
    assert!(headers
        .get_all("vary")
        .iter()
        .any(|v| v.to_str().unwrap_or_default().to_ascii_lowercase().contains("origin")));

    // Other routes keep the wildcard and never allow credentials.
    let products = app.client().get("/products").add_header("Origin", origin).await;
    assert_eq!(
        products.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    assert!(products
        .headers()
        .get("access-control-allow-credentials")
        .is_none());
}
