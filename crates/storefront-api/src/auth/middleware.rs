use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use storefront_core::AppError;

use super::basic::{BasicAuthorizer, Effect};
use crate::error::HttpAppError;

/// Guard a route with the Basic authorizer: no header is 401, a Deny is 403.
pub async fn basic_auth_middleware(
    State(authorizer): State<Arc<BasicAuthorizer>>,
    request: Request,
    next: Next,
) -> Response {
    let token = match request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| value.to_str())
    {
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing Authorization header".to_string(),
            ))
            .into_response()
        }
        Some(Ok(token)) => Some(token),
        Some(Err(_)) => None,
    };

    let decision = authorizer.decide(token);
    match decision.effect {
        Effect::Allow => {
            tracing::debug!(principal = %decision.principal, "Request authorized");
            next.run(request).await
        }
        Effect::Deny => {
            tracing::warn!(
                principal = %decision.principal,
                path = %request.uri().path(),
                "Request denied"
            );
            HttpAppError(AppError::Forbidden(format!(
                "Access denied for {}",
                decision.principal
            )))
            .into_response()
        }
    }
}
