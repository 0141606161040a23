//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while issuing or checking tokens.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token was presented.
    #[error("missing authorization token")]
    MissingToken,

    /// Token is malformed, mis-signed, uses an unexpected algorithm, or has
    /// expired.
    #[error("invalid token")]
    InvalidToken,

    /// Signing a new token failed.
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}
