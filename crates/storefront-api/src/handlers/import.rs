//! Signed upload URL for CSV imports.

use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use storefront_core::{constants::CSV_CONTENT_TYPE, AppError};
use storefront_storage::keys;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

const SIGNING_FAILED: &str = "Error generating signed URL";

pub const IMPORT_PATH: &str = "/import";

#[derive(Debug, Deserialize)]
pub struct ImportQuery {
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET /import?name=<file>` returns a short-lived PUT URL for `uploaded/<file>`.
#[tracing::instrument(skip(state))]
pub async fn import_products_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ImportQuery>,
) -> Result<Response, HttpAppError> {
    let name = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::Validation("File name is required".to_string()))?;

    let key = keys::incoming_key(name);

    match state
        .storage
        .presigned_put_url(&key, CSV_CONTENT_TYPE, state.import_url_expiry)
        .await
    {
        Ok(url) => {
            tracing::info!(
                key = %key,
                expires_in_secs = state.import_url_expiry.as_secs(),
                content_type = CSV_CONTENT_TYPE,
                "Signed upload URL issued"
            );
            Ok(Json(url).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, key = %key, "Failed to sign upload URL");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(SIGNING_FAILED)),
            )
                .into_response())
        }
    }
}

/// Credentialed CORS for the import route.
///
/// Browsers reject `Access-Control-Allow-Origin: *` alongside credentials, so a wildcard is
/// narrowed to the caller's origin. Runs outside the CORS layer.
pub async fn allow_credentials(request: Request, next: Next) -> Response {
    if request.uri().path() != IMPORT_PATH {
        return next.run(request).await;
    }

    let origin = request.headers().get(header::ORIGIN).cloned();
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    if let Some(origin) = origin {
        if headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_some_and(|v| v == "*")
        {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            headers.append(header::VARY, HeaderValue::from_static("origin"));
        }
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    response
}
