//! Cartpay payment service.
//!
//! Serves `payment.PaymentService` over gRPC on `PORT_PAYMENT` (default
//! 9061), storing payments in the `payments` collection of
//! `PAYMENT_DB_NAME`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use cartpay_backend::db::{MongoPaymentRepository, Store};
use cartpay_backend::services::{PaymentLedger, TokenIssuer};
use cartpay_backend::{Config, shutdown_signal, telemetry};

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = Config::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = telemetry::init_sentry(&config);
    telemetry::init_tracing("cartpay_payment=info,cartpay_backend=info");
    config.warn_defaults();

    let store = Store::connect(&config.mongo_uri, "cartpay-payment")
        .await
        .expect("Failed to create database client");
    tracing::info!("Database client created");

    let payments = Arc::new(MongoPaymentRepository::new(&store, &config.payment_db_name));
    let ledger = Arc::new(PaymentLedger::new(payments));
    let tokens = Arc::new(TokenIssuer::new(&config.jwt_secret));

    let addr = config.payment_addr();
    tracing::info!("payment gRPC server listening on {}", addr);

    let reflection =
        cartpay_payment::reflection_service().expect("Failed to build reflection service");

    cartpay_payment::server_builder()
        .add_service(cartpay_payment::service(ledger, tokens))
        .add_service(reflection)
        .serve_with_shutdown(addr, shutdown_signal())
        .await
        .expect("Server error");
}
