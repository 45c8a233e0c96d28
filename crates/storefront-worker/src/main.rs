use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use storefront_core::Config;
use storefront_db::create_catalog_store;
use storefront_infra::aws::load_sdk_config;
use storefront_infra::{
    init_tracing, InMemoryTopic, NotificationPublisher, SnsPublisher, SqsQueue,
};
use storefront_services::{CatalogBatchProcessor, ImportFileParser};
use storefront_storage::create_storage;
use storefront_worker::{CatalogBatchHandler, PollerConfig, QueuePoller, UploadEventHandler};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format()).map_err(|e| anyhow!("Failed to initialize tracing: {}", e))?;
    config.validate()?;

    let catalog_queue_url = config
        .catalog_queue_url()
        .context("CATALOG_QUEUE_URL must be set for the worker")?;
    let upload_events_queue_url = config
        .upload_events_queue_url()
        .context("UPLOAD_EVENTS_QUEUE_URL must be set for the worker")?;

    let sdk_config = load_sdk_config(config.aws_region(), None).await;

    let store = create_catalog_store(&config, false).await?;
    let storage = create_storage(&config)
        .await
        .context("Failed to initialize storage")?;

    let publisher: Arc<dyn NotificationPublisher> = match config.notification_topic_arn() {
        Some(arn) => Arc::new(SnsPublisher::new(&sdk_config, arn.to_string())),
        None => {
            tracing::warn!("NOTIFICATION_TOPIC_ARN not set; notifications stay in process");
            Arc::new(InMemoryTopic::new())
        }
    };

    let catalog_queue = Arc::new(SqsQueue::new(&sdk_config, catalog_queue_url.to_string()));
    let upload_queue = Arc::new(SqsQueue::new(
        &sdk_config,
        upload_events_queue_url.to_string(),
    ));

    let base = PollerConfig {
        wait_time: Duration::from_secs(config.queue_wait_time_secs()),
        invocation_timeout: Duration::from_secs(config.invocation_timeout_secs()),
        ..PollerConfig::default()
    };

    let processor = CatalogBatchProcessor::new(store, publisher)
        .with_max_batch_size(config.catalog_batch_size());
    let catalog_poller = QueuePoller::new(
        catalog_queue.clone(),
        Arc::new(CatalogBatchHandler::new(processor)),
        base.clone().with_batch_size(config.catalog_batch_size()),
    )
    .spawn();

    // The import parser dispatches onto the queue the catalog poller drains.
    let parser = ImportFileParser::new(storage, catalog_queue);
    let upload_poller = QueuePoller::new(
        upload_queue,
        Arc::new(UploadEventHandler::new(parser)),
        base.with_batch_size(1),
    )
    .spawn();

    tracing::info!("Worker ready");

    shutdown_signal().await;

    upload_poller.shutdown().await;
    catalog_poller.shutdown().await;

    tracing::info!("Worker stopped");
    Ok(())
}

/// Wait for Ctrl+C (SIGINT) or SIGTERM.
///
/// # Panics
/// Panics if a signal handler cannot be installed (unrecoverable system error).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
