//! Business logic services.
//!
//! # Services
//!
//! - `products` - Product catalog (create, list, get, update, delete)
//! - `payments` - Payment ledger (create, list, get, delete)
//! - `auth` - Token issuing and validation shared by both transports
//!
//! Services validate every input before touching storage, so a rejected
//! request never causes a write.

pub mod auth;
pub mod payments;
pub mod products;

use cartpay_core::{IdError, ValidationError};
use thiserror::Error;

use crate::db::RepositoryError;

pub use auth::{AuthError, Claims, TokenIssuer, bearer_token};
pub use payments::{PaymentLedger, PaymentService};
pub use products::{ProductCatalog, ProductService};

/// Errors returned by the product and payment services.
///
/// Transports map the variants one-to-one: bad input to 400 or
/// `InvalidArgument`, not found to 404 or `NotFound`, storage to 500 or
/// `Internal`.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed id or a field that fails validation.
    #[error("{0}")]
    InvalidInput(String),

    /// No record with the given id.
    #[error("{0}")]
    NotFound(String),

    /// The store failed.
    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<IdError> for ServiceError {
    fn from(err: IdError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_invalid_input() {
        let err = ServiceError::from(ValidationError::NotPositive("price"));
        assert!(matches!(&err, ServiceError::InvalidInput(_)));
        assert_eq!(err.to_string(), "price must be greater than 0");
    }

    #[test]
    fn test_id_errors_are_invalid_input() {
        let err = ServiceError::from(IdError::InvalidLength(3));
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }
}
