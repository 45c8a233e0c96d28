use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use std::sync::Arc;
use storefront_core::{validation::INVALID_JSON, AppError};

use crate::error::HttpAppError;
use crate::state::AppState;

#[tracing::instrument(skip(state))]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let products = state.products.list().await?;
    tracing::debug!(count = products.len(), "Listed products");
    Ok(Json(products))
}

#[tracing::instrument(skip(state))]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let product = state.products.find(&id).await?;
    Ok(Json(product))
}

/// The raw body goes to validation untouched so missing, malformed and mistyped bodies each
/// get their own message.
#[tracing::instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    let body = if body.is_empty() {
        None
    } else {
        Some(
            std::str::from_utf8(&body)
                .map_err(|_| AppError::Validation(INVALID_JSON.to_string()))?,
        )
    };

    let product = state.products.create(body).await?;
    Ok((StatusCode::CREATED, Json(product)))
}
