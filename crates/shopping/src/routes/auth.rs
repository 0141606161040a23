//! Login route.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::JsonBody;
use crate::error::{AppError, ErrorResponse, Result};
use crate::state::AppState;

/// Body of `POST /login`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "user-42")]
    pub user_id: String,
}

/// Response of `POST /login`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Issue a token for the given user id. No credential check is performed.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed token, valid for 24 hours", body = LoginResponse),
        (status = 400, description = "Blank user id or bad JSON", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip(state, request), fields(user_id = %request.user_id))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::BadRequest("user_id is required".to_string()));
    }

    let token = state.tokens().issue(&request.user_id)?;
    tracing::info!("Token issued");

    Ok(Json(LoginResponse { token }))
}
