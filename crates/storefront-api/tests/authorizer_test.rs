//! Token authorizer endpoint integration tests.
//!
//! Run with: `cargo test -p storefront-api --test authorizer_test`

mod helpers;

use helpers::{basic_auth, setup_test_app, setup_test_app_with, test_config, TEST_PASSWORD, TEST_USERNAME};
use serde_json::{json, Value};

const METHOD_ARN: &str = "arn:aws:execute-api:eu-west-1:123456789012:abc123/dev/GET/import";

fn event(token: Option<String>) -> Value {
    json!({
        "type": "TOKEN",
        "authorizationToken": token,
        "methodArn": METHOD_ARN,
    })
}

#[tokio::test]
async fn test_valid_credentials_are_allowed() {
    let app = setup_test_app();

    let response = app
        .client()
        .post("/authorize")
        .json(&event(Some(basic_auth(TEST_USERNAME, TEST_PASSWORD))))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "principalId": "admin",
            "policyDocument": {
                "Version": "2012-10-17",
                "Statement": [{
                    "Action": "execute-api:Invoke",
                    "Effect": "Allow",
                    "Resource": METHOD_ARN,
                }]
            }
        })
    );
}

#[tokio::test]
async fn test_wrong_password_is_denied_for_that_user() {
    let app = setup_test_app();

    let body: Value = app
        .client()
        .post("/authorize")
        .json(&event(Some(basic_auth(TEST_USERNAME, "letmein"))))
        .await
        .json();

    assert_eq!(body["principalId"], "admin");
    assert_eq!(body["policyDocument"]["Statement"][0]["Effect"], "Deny");
}

#[tokio::test]
async fn test_missing_token_is_denied_anonymously() {
    let app = setup_test_app();

    let body: Value = app.client().post("/authorize").json(&event(None)).await.json();

    assert_eq!(body["principalId"], "unauthorized");
    assert_eq!(body["policyDocument"]["Statement"][0]["Effect"], "Deny");
}

#[tokio::test]
async fn test_unconfigured_credentials_deny_everything() {
    let mut config = test_config();
    config.0.auth_username = None;
    config.0.auth_password = None;
    let app = setup_test_app_with(config);

    let body: Value = app
        .client()
        .post("/authorize")
        .json(&event(Some(basic_auth(TEST_USERNAME, TEST_PASSWORD))))
        .await
        .json();

    assert_eq!(body["policyDocument"]["Statement"][0]["Effect"], "Deny");
}

#[tokio::test]
async fn test_malformed_event_is_400() {
    let app = setup_test_app();

    let response = app.client().post("/authorize").text("not json").await;

    assert_eq!(response.status_code(), 400);
}
