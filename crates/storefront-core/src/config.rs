//! Configuration module
//!
//! Configuration for the HTTP API, the queue workers and the admin CLI. Everything is read
//! from the environment (optionally seeded from a `.env` file) with a default per field.

use std::env;

use crate::constants;
use crate::storage_types::{CatalogStoreKind, StorageBackend};

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const QUEUE_WAIT_TIME_SECS: u64 = 20;

/// Base configuration shared by every binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
    pub log_format: Option<String>,
}

/// Storefront configuration
#[derive(Clone, Debug)]
pub struct StorefrontConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub catalog_store: CatalogStoreKind,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, LocalStack)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub import_url_expiry_secs: u64,
    // Messaging configuration
    pub catalog_queue_url: Option<String>,
    pub upload_events_queue_url: Option<String>,
    pub notification_topic_arn: Option<String>,
    pub catalog_batch_size: usize,
    pub queue_wait_time_secs: u64,
    pub invocation_timeout_secs: u64,
    // Basic authorizer credentials
    pub auth_username: Option<String>,
    pub auth_password: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<StorefrontConfig>);

impl Config {
    fn inner(&self) -> &StorefrontConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = StorefrontConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn log_format(&self) -> Option<&str> {
        self.inner().base.log_format.as_deref()
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn catalog_store(&self) -> CatalogStoreKind {
        self.inner().catalog_store
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    /// Region for bucket access, falling back to the generic AWS region.
    pub fn s3_region(&self) -> Option<&str> {
        self.inner()
            .s3_region
            .as_deref()
            .or(self.inner().aws_region.as_deref())
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn import_url_expiry_secs(&self) -> u64 {
        self.inner().import_url_expiry_secs
    }

    pub fn catalog_queue_url(&self) -> Option<&str> {
        self.inner().catalog_queue_url.as_deref()
    }

    pub fn upload_events_queue_url(&self) -> Option<&str> {
        self.inner().upload_events_queue_url.as_deref()
    }

    pub fn notification_topic_arn(&self) -> Option<&str> {
        self.inner().notification_topic_arn.as_deref()
    }

    pub fn catalog_batch_size(&self) -> usize {
        self.inner().catalog_batch_size
    }

    pub fn queue_wait_time_secs(&self) -> u64 {
        self.inner().queue_wait_time_secs
    }

    pub fn invocation_timeout_secs(&self) -> u64 {
        self.inner().invocation_timeout_secs
    }

    pub fn auth_username(&self) -> Option<&str> {
        self.inner().auth_username.as_deref()
    }

    pub fn auth_password(&self) -> Option<&str> {
        self.inner().auth_password.as_deref()
    }
}

fn is_production_env(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl StorefrontConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .unwrap_or(SERVER_PORT),
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment,
            log_format: optional_var("LOG_FORMAT"),
        };

        let catalog_store = match optional_var("CATALOG_STORE") {
            Some(value) => value.parse()?,
            None => CatalogStoreKind::Postgres,
        };

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) if catalog_store == CatalogStoreKind::Memory => String::new(),
            Err(_) => return Err(anyhow::anyhow!("DATABASE_URL must be set")),
        };

        let storage_backend = optional_var("STORAGE_BACKEND")
            .map(|value| value.parse::<StorageBackend>())
            .transpose()?;

        let catalog_batch_size = env::var("CATALOG_BATCH_SIZE")
            .unwrap_or_else(|_| constants::CATALOG_BATCH_SIZE.to_string())
            .parse()
            .unwrap_or(constants::CATALOG_BATCH_SIZE);

        Ok(StorefrontConfig {
            base,
            database_url,
            catalog_store,
            storage_backend,
            s3_bucket: optional_var("S3_BUCKET"),
            s3_region: optional_var("S3_REGION"),
            s3_endpoint: optional_var("S3_ENDPOINT"),
            aws_region: optional_var("AWS_REGION"),
            local_storage_path: optional_var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: optional_var("LOCAL_STORAGE_BASE_URL"),
            import_url_expiry_secs: env::var("IMPORT_URL_EXPIRY_SECS")
                .unwrap_or_else(|_| constants::IMPORT_URL_EXPIRY_SECS.to_string())
                .parse()
                .unwrap_or(constants::IMPORT_URL_EXPIRY_SECS),
            catalog_queue_url: optional_var("CATALOG_QUEUE_URL"),
            upload_events_queue_url: optional_var("UPLOAD_EVENTS_QUEUE_URL"),
            notification_topic_arn: optional_var("NOTIFICATION_TOPIC_ARN"),
            catalog_batch_size,
            queue_wait_time_secs: env::var("QUEUE_WAIT_TIME_SECS")
                .unwrap_or_else(|_| QUEUE_WAIT_TIME_SECS.to_string())
                .parse()
                .unwrap_or(QUEUE_WAIT_TIME_SECS),
            invocation_timeout_secs: env::var("INVOCATION_TIMEOUT_SECS")
                .unwrap_or_else(|_| constants::INVOCATION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(constants::INVOCATION_TIMEOUT_SECS),
            auth_username: optional_var("AUTH_USERNAME"),
            auth_password: optional_var("AUTH_PASSWORD"),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.catalog_store == CatalogStoreKind::Postgres
            && !(self.database_url.starts_with("postgresql://")
                || self.database_url.starts_with("postgres://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.catalog_batch_size == 0 || self.catalog_batch_size > constants::MAX_QUEUE_BATCH_SIZE
        {
            return Err(anyhow::anyhow!(
                "CATALOG_BATCH_SIZE must be between 1 and {}",
                constants::MAX_QUEUE_BATCH_SIZE
            ));
        }

        if self.queue_wait_time_secs > 20 {
            return Err(anyhow::anyhow!("QUEUE_WAIT_TIME_SECS must be at most 20"));
        }

        if self.invocation_timeout_secs == 0 {
            return Err(anyhow::anyhow!("INVOCATION_TIMEOUT_SECS must be positive"));
        }

        if self.import_url_expiry_secs == 0 || self.import_url_expiry_secs > 7 * 24 * 3600 {
            return Err(anyhow::anyhow!(
                "IMPORT_URL_EXPIRY_SECS must be between 1 second and 7 days"
            ));
        }

        if self.auth_username.is_some() != self.auth_password.is_some() {
            return Err(anyhow::anyhow!(
                "AUTH_USERNAME and AUTH_PASSWORD must be set together"
            ));
        }

        // Validate storage backend configuration
        let backend = self.storage_backend.unwrap_or(StorageBackend::S3);
        match backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StorefrontConfig {
        StorefrontConfig {
            base: BaseConfig {
                server_port: SERVER_PORT,
                cors_origins: vec!["*".to_string()],
                db_max_connections: MAX_CONNECTIONS,
                db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
                environment: "development".to_string(),
                log_format: None,
            },
            database_url: "postgresql://localhost/storefront".to_string(),
            catalog_store: CatalogStoreKind::Postgres,
            storage_backend: Some(StorageBackend::S3),
            s3_bucket: Some("import-bucket".to_string()),
            s3_region: None,
            s3_endpoint: None,
            aws_region: Some("eu-west-1".to_string()),
            local_storage_path: None,
            local_storage_base_url: None,
            import_url_expiry_secs: constants::IMPORT_URL_EXPIRY_SECS,
            catalog_queue_url: None,
            upload_events_queue_url: None,
            notification_topic_arn: None,
            catalog_batch_size: constants::CATALOG_BATCH_SIZE,
            queue_wait_time_secs: QUEUE_WAIT_TIME_SECS,
            invocation_timeout_secs: constants::INVOCATION_TIMEOUT_SECS,
            auth_username: Some("admin".to_string()),
            auth_password: Some("TEST_PASSWORD".to_string()),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_s3_region_falls_back_to_aws_region() {
        let config = Config(Box::new(sample()));
        assert_eq!(config.s3_region(), Some("eu-west-1"));
    }

    #[test]
    fn test_batch_size_bounds() {
        let mut config = sample();
        config.catalog_batch_size = 0;
        assert!(config.validate().is_err());
        config.catalog_batch_size = 11;
        assert!(config.validate().is_err());
        config.catalog_batch_size = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_memory_store_does_not_need_database_url() {
        let mut config = sample();
        config.catalog_store = CatalogStoreKind::Memory;
        config.database_url = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_half_configured_credentials_rejected() {
        let mut config = sample();
        config.auth_password = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_local_backend_requires_path() {
        let mut config = sample();
        config.storage_backend = Some(StorageBackend::Local);
        assert!(config.validate().is_err());
        config.local_storage_path = Some("/tmp/storefront".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_detection() {
        let mut config = sample();
        config.base.environment = "PROD".to_string();
        assert!(Config(Box::new(config)).is_production());
    }
}
