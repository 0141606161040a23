//! HTTP middleware stack for the REST gateway.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (add unique ID to each request)
//! 4. Auth guard (protected routes only)

pub mod auth;
pub mod request_id;

pub use auth::{CurrentClaims, require_auth};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
