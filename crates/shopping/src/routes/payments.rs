//! Payment route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use cartpay_backend::models::{PaymentRequest, PaymentResponse};

use super::{JsonBody, MessageResponse};
use crate::error::{ErrorResponse, Result};
use crate::middleware::CurrentClaims;
use crate::state::AppState;

/// Record a payment.
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tag = "payments",
    request_body = PaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentResponse),
        (status = 400, description = "Non-positive amount or bad JSON", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn create(
    State(state): State<AppState>,
    CurrentClaims(claims): CurrentClaims,
    JsonBody(request): JsonBody<PaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>)> {
    let payment = state.payments().create(request).await?;
    tracing::debug!(user_id = %claims.user_id, payment_id = %payment.id, "Payment created via REST");
    Ok((StatusCode::CREATED, Json(payment)))
}

/// List every payment.
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "payments",
    responses(
        (status = 200, description = "All payments", body = [PaymentResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PaymentResponse>>> {
    Ok(Json(state.payments().list().await?))
}

/// Get one payment.
#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    tag = "payments",
    params(("id" = String, Path, description = "Payment id, 24 hex characters")),
    responses(
        (status = 200, description = "The payment", body = PaymentResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such payment", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PaymentResponse>> {
    Ok(Json(state.payments().get(&id).await?))
}

/// Delete a payment.
#[utoipa::path(
    delete,
    path = "/api/v1/payments/{id}",
    tag = "payments",
    params(("id" = String, Path, description = "Payment id, 24 hex characters")),
    responses(
        (status = 200, description = "Payment deleted", body = MessageResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such payment", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.payments().delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Payment deleted successfully",
    }))
}
