use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::auth::AuthorizerEvent;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;

/// Token authorizer endpoint. Always answers 200 with an Allow or Deny policy.
#[tracing::instrument(skip(state, event), fields(method_arn = %event.method_arn))]
pub async fn authorize(
    State(state): State<Arc<AppState>>,
    ValidatedJson(event): ValidatedJson<AuthorizerEvent>,
) -> Result<impl IntoResponse, HttpAppError> {
    Ok(Json(state.authorizer.authorize(&event)))
}
