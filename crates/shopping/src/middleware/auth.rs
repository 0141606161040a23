//! Bearer-token guard and claims extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use cartpay_backend::services::{AuthError, Claims};

use crate::error::AppError;
use crate::state::AppState;

/// Middleware that rejects requests without a valid bearer token.
///
/// Runs before any extractor of the wrapped routes, so a rejected request
/// never reaches a handler. On success the verified [`Claims`] are stored in
/// the request extensions.
///
/// # Errors
///
/// Returns 401 with `{"error": "missing authorization token"}` or
/// `{"error": "invalid token"}`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| AuthError::InvalidToken))
        .transpose()?;

    let claims = state.tokens().validate_header(header)?;

    tracing::Span::current().record("user_id", claims.user_id.as_str());
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Extractor for the claims attached by [`require_auth`].
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentClaims(claims): CurrentClaims) -> String {
///     claims.user_id
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentClaims(pub Claims);

impl<S> FromRequestParts<S> for CurrentClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(Self)
            .ok_or(AppError::Auth(AuthError::MissingToken))
    }
}
