//! HTTP route handlers for the REST gateway.
//!
//! # Route Structure
//!
//! Paths are relative to the `/api/v1` base path.
//!
//! ```text
//! # Auth (public)
//! POST   /login            - Issue a token for a user id
//!
//! # Products (bearer token required)
//! POST   /products         - Create product
//! GET    /products         - List products
//! GET    /products/{id}    - Get product
//! PUT    /products/{id}    - Update product
//! DELETE /products/{id}    - Delete product
//!
//! # Payments (bearer token required)
//! POST   /payments         - Create payment
//! GET    /payments         - List payments
//! GET    /payments/{id}    - Get payment
//! DELETE /payments/{id}    - Delete payment
//! ```

pub mod auth;
pub mod payments;
pub mod products;

use axum::{
    Router,
    extract::FromRequest,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::middleware::require_auth;
use crate::state::AppState;

/// Base path all API routes are nested under.
pub const API_BASE_PATH: &str = "/api/v1";

/// JSON body extractor whose rejections render as `{"error": ...}` with 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Confirmation body returned by delete routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(value_type = String)]
    pub message: &'static str,
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(products::create).get(products::list))
        .route(
            "/products/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the payment routes router. Payments have no update route.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payments", post(payments::create).get(payments::list))
        .route(
            "/payments/{id}",
            get(payments::show).delete(payments::delete),
        )
}

/// Create the API router: public login plus the guarded resources.
pub fn routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(product_routes())
        .merge(payment_routes())
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/login", post(auth::login))
        .merge(protected)
}
