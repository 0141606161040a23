//! Core types for Cartpay.
//!
//! This module provides type-safe wrappers for the fields the service layer
//! validates before anything reaches storage.

pub mod id;
pub mod name;
pub mod price;

pub use id::*;
pub use name::ProductName;
pub use price::{Amount, Price};

/// A field failed validation.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The field is missing or empty.
    #[error("{0} is required")]
    Required(&'static str),
    /// The field must be strictly positive.
    #[error("{0} must be greater than 0")]
    NotPositive(&'static str),
    /// The field is NaN or infinite.
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
    /// The field is finite but outside the range a decimal holds exactly.
    #[error("{0} is out of range")]
    OutOfRange(&'static str),
}
