//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use cartpay_backend::models::{ProductRequest, ProductResponse};

use super::{JsonBody, MessageResponse};
use crate::error::{ErrorResponse, Result};
use crate::middleware::CurrentClaims;
use crate::state::AppState;

/// Create a product.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Blank name, non-positive price or bad JSON", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn create(
    State(state): State<AppState>,
    CurrentClaims(claims): CurrentClaims,
    JsonBody(request): JsonBody<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let product = state.products().create(request).await?;
    tracing::debug!(user_id = %claims.user_id, product_id = %product.id, "Product created via REST");
    Ok((StatusCode::CREATED, Json(product)))
}

/// List every product.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "products",
    responses(
        (status = 200, description = "All products", body = [ProductResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>> {
    Ok(Json(state.products().list().await?))
}

/// Get one product.
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id, 24 hex characters")),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such product", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>> {
    Ok(Json(state.products().get(&id).await?))
}

/// Overwrite the name and price of a product.
#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id, 24 hex characters")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "The updated product", body = ProductResponse),
        (status = 400, description = "Malformed id or invalid fields", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such product", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<ProductRequest>,
) -> Result<Json<ProductResponse>> {
    Ok(Json(state.products().update(&id, request).await?))
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product id, 24 hex characters")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such product", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    state.products().delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Product deleted successfully",
    }))
}
