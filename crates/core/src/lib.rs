//! Cartpay Core - Shared value types.
//!
//! This crate provides the validated types used across all Cartpay components:
//! - `backend` - Repositories, services, token issuer and scheduler
//! - `shopping` - REST gateway for products and payments
//! - `payment` - gRPC payment service
//! - `cli` - Operator command-line tools
//!
//! # Architecture
//!
//! The core crate contains only types and their validation rules - no I/O,
//! no database access, no transport concerns. Every constraint that the
//! service layer enforces on incoming data lives here.
//!
//! # Modules
//!
//! - [`types`] - Object ids, product names, prices and payment amounts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
