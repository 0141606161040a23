//! Cartpay backend library.
//!
//! Everything the REST gateway and the gRPC payment service share:
//! configuration, the document store adapter and repositories, the
//! validating services, the token issuer and the cleanup scheduler.
//!
//! Request flow through this crate is always
//! service (validation) → repository → store; neither transport talks to a
//! repository directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod shutdown;
pub mod telemetry;

pub use config::{Config, ConfigError};
pub use scheduler::{CleanupReport, CleanupScheduler};
pub use shutdown::{Shutdown, shutdown_signal};
