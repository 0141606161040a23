//! Cartpay payment RPC service.
//!
//! Exposes payment create/list/get/delete over gRPC as
//! `payment.PaymentService`. Products are not available over RPC, and
//! payments cannot be updated.
//!
//! # Modules
//!
//! - [`proto`] - `prost` messages
//! - [`server`] - Tower service routing methods to a [`server::PaymentRpc`]
//! - [`handler`] - Binds the methods to the payment service
//! - [`interceptor`] - Bearer-token check ahead of every method
//! - [`client`] - Typed client
//! - [`descriptor`] - Descriptor set served by reflection

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod descriptor;
pub mod handler;
pub mod interceptor;
pub mod proto;
pub mod server;

use std::sync::Arc;

use cartpay_backend::services::{PaymentService, TokenIssuer};
use tonic::codegen::InterceptedService;
use tonic_reflection::pb::v1::server_reflection_server::{ServerReflection, ServerReflectionServer};

pub use client::PaymentClient;
pub use handler::PaymentHandler;
pub use interceptor::AuthInterceptor;
pub use server::{PaymentRpc, PaymentServiceServer};

/// The authenticated payment service, ready for `Server::add_service`.
pub type AuthenticatedPaymentService =
    InterceptedService<PaymentServiceServer<PaymentHandler>, AuthInterceptor>;

/// Build the payment service guarded by the token interceptor.
#[must_use]
pub fn service(
    payments: Arc<dyn PaymentService>,
    tokens: Arc<TokenIssuer>,
) -> AuthenticatedPaymentService {
    InterceptedService::new(
        PaymentServiceServer::new(PaymentHandler::new(payments)),
        AuthInterceptor::new(tokens),
    )
}

/// Build the reflection service describing `payment.PaymentService`.
///
/// Served without the token interceptor.
///
/// # Errors
///
/// Fails if the descriptor set is rejected by the reflection builder.
pub fn reflection_service()
-> Result<ServerReflectionServer<impl ServerReflection>, tonic_reflection::server::Error> {
    tonic_reflection::server::Builder::configure()
        .register_file_descriptor_set(descriptor::file_descriptor_set())
        .build_v1()
}

/// Build a transport server with request tracing.
#[must_use]
pub fn server_builder() -> tonic::transport::Server {
    tonic::transport::Server::builder().trace_fn(|request| {
        tracing::info_span!("grpc_request", method = %request.uri().path())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflection_service_accepts_descriptor_set() {
        assert!(reflection_service().is_ok());
    }
}
