//! CLI command implementations.

pub mod payments;
pub mod token;

use cartpay_backend::ConfigError;
use cartpay_backend::services::AuthError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Token could not be issued.
    #[error("Token error: {0}")]
    Auth(#[from] AuthError),

    /// Connecting to the payment service failed.
    #[error("Connection error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// The payment service returned an error status.
    #[error("{}: {}", .0.code(), .0.message())]
    Rpc(#[from] tonic::Status),

    /// Token is not valid as request metadata.
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] tonic::metadata::errors::InvalidMetadataValue),
}
