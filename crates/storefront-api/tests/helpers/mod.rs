//! Test helpers: build the router over in-memory collaborators.
//!
//! Run from workspace root: `cargo test -p storefront-api`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storefront_api::setup::{routes, services};
use storefront_core::{BaseConfig, CatalogStoreKind, Config, StorageBackend, StorefrontConfig};
use storefront_db::InMemoryCatalogStore;
use storefront_storage::{Storage, StorageError, StorageResult};

pub const TEST_USERNAME: &str = "admin";
pub const TEST_PASSWORD: &str = "s3cret";

/// Bucket stand-in that can sign upload URLs.
#[derive(Default)]
pub struct SigningStorage {
    pub fail_signing: AtomicBool,
    pub signed: Mutex<Vec<(String, String, Duration)>>,
}

impl SigningStorage {
    pub fn signed(&self) -> Vec<(String, String, Duration)> {
        self.signed.lock().unwrap().clone()
    }
}

fn unused(op: &str) -> StorageError {
    StorageError::BackendError(format!("{} is not used by the HTTP API", op))
}

#[async_trait]
impl Storage for SigningStorage {
    async fn upload_with_key(&self, _: &str, _: Vec<u8>, _: &str) -> StorageResult<String> {
        Err(unused("upload"))
    }

    async fn download(&self, _: &str) -> StorageResult<Vec<u8>> {
        Err(unused("download"))
    }

    async fn delete(&self, _: &str) -> StorageResult<()> {
        Err(unused("delete"))
    }

    async fn copy(&self, _: &str, _: &str) -> StorageResult<String> {
        Err(unused("copy"))
    }

    async fn exists(&self, _: &str) -> StorageResult<bool> {
        Err(unused("exists"))
    }

    async fn presigned_put_url(
        &self,
        storage_key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        if self.fail_signing.load(Ordering::SeqCst) {
            return Err(StorageError::SigningFailed("credentials expired".to_string()));
        }
        self.signed.lock().unwrap().push((
            storage_key.to_string(),
            content_type.to_string(),
            expires_in,
        ));
        Ok(format!(
            "https://imports.s3.eu-west-1.amazonaws.com/{}?X-Amz-Expires={}",
            storage_key,
            expires_in.as_secs()
        ))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

pub fn test_config() -> Config {
    Config(Box::new(StorefrontConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 5,
            environment: "test".to_string(),
            log_format: None,
        },
        database_url: String::new(),
        catalog_store: CatalogStoreKind::Memory,
        storage_backend: Some(StorageBackend::S3),
        s3_bucket: Some("imports".to_string()),
        s3_region: Some("eu-west-1".to_string()),
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: None,
        local_storage_base_url: None,
        import_url_expiry_secs: 300,
        catalog_queue_url: None,
        upload_events_queue_url: None,
        notification_topic_arn: None,
        catalog_batch_size: 5,
        queue_wait_time_secs: 20,
        invocation_timeout_secs: 30,
        auth_username: Some(TEST_USERNAME.to_string()),
        auth_password: Some(TEST_PASSWORD.to_string()),
    }))
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryCatalogStore>,
    pub storage: Arc<SigningStorage>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(test_config())
}

pub fn setup_test_app_with(config: Config) -> TestApp {
    let store = Arc::new(InMemoryCatalogStore::new());
    let storage = Arc::new(SigningStorage::default());

    let state = services::initialize_services(&config, store.clone(), storage.clone())
        .expect("Failed to build application state");
    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    let server =
        TestServer::new(router.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        store,
        storage,
    }
}

/// Router over an arbitrary storage backend, for checks that need a real signer.
pub fn server_with_storage(config: Config, storage: Arc<dyn Storage>) -> TestServer {
    let store = Arc::new(InMemoryCatalogStore::new());
    let state = services::initialize_services(&config, store, storage)
        .expect("Failed to build application state");
    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    TestServer::new(router.into_make_service()).expect("Failed to create test server")
}

pub fn basic_auth(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", username, password))
    )
}
