//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use storefront_core::Config;
use storefront_db::create_catalog_store;
use storefront_infra::init_tracing;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    init_tracing(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    let store = create_catalog_store(&config, true).await?;
    let storage = storage::setup_storage(&config).await?;

    let state = services::initialize_services(&config, store, storage)?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
