//! Token issuing and validation.
//!
//! Tokens are HMAC-signed JWTs carrying a `user_id`, `iat` and `exp`.
//! One [`TokenIssuer`] is built from configuration at startup and shared by
//! the HTTP guard and the gRPC interceptor; the secret is never stored in
//! global state.

mod error;

pub use error::AuthError;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Lifetime of an issued token.
pub const TOKEN_TTL_HOURS: i64 = 24;

const BEARER_PREFIX: &str = "Bearer ";

/// Verified token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject the token was issued to.
    pub user_id: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Issues and validates signed tokens with a single shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer for the given signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let key = secret.expose_secret().as_bytes();

        // HMAC family only.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
        }
    }

    /// Issue a token for `user_id`, valid for [`TOKEN_TTL_HOURS`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if encoding fails.
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user_id.to_owned(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(AuthError::Signing)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingToken` for an empty token and
    /// `AuthError::InvalidToken` for any signature, algorithm, format or
    /// expiry failure.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AuthError::InvalidToken
            })
    }

    /// Validate the raw value of an `authorization` header or metadata
    /// entry.
    ///
    /// # Errors
    ///
    /// See [`TokenIssuer::validate`].
    pub fn validate_header(&self, value: Option<&str>) -> Result<Claims, AuthError> {
        let token = value.map(bearer_token).unwrap_or_default();
        self.validate(token)
    }
}

/// Strip an optional `Bearer ` prefix and surrounding whitespace.
#[must_use]
pub fn bearer_token(value: &str) -> &str {
    let value = value.trim_start();
    value.strip_prefix(BEARER_PREFIX).unwrap_or(value).trim()
}
