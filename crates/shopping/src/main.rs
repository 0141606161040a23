//! Cartpay shopping gateway.
//!
//! Serves the REST API on `PORT_SHOPPING` (default 9051) and runs the
//! periodic cleanup pass in the background.
//!
//! # Storage
//!
//! - `products` collection in `SHOPPING_DB_NAME`
//! - `payments` collection in `PAYMENT_DB_NAME`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use cartpay_backend::db::{MongoPaymentRepository, MongoProductRepository, Store};
use cartpay_backend::services::{PaymentLedger, ProductCatalog, TokenIssuer};
use cartpay_backend::{CleanupScheduler, Config, Shutdown, shutdown_signal, telemetry};
use cartpay_shopping::{AppState, app};

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = Config::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = telemetry::init_sentry(&config);
    telemetry::init_tracing("cartpay_shopping=info,cartpay_backend=info,tower_http=debug");
    config.warn_defaults();

    let store = Store::connect(&config.mongo_uri, "cartpay-shopping")
        .await
        .expect("Failed to create database client");
    tracing::info!("Database client created");

    let products = Arc::new(MongoProductRepository::new(&store, &config.shopping_db_name));
    let payments = Arc::new(MongoPaymentRepository::new(&store, &config.payment_db_name));
    let tokens = Arc::new(TokenIssuer::new(&config.jwt_secret));

    let state = AppState::new(
        Arc::new(ProductCatalog::new(products.clone())),
        Arc::new(PaymentLedger::new(payments.clone())),
        tokens,
    )
    .with_store(
        store,
        vec![
            config.shopping_db_name.clone(),
            config.payment_db_name.clone(),
        ],
    );

    // Start the cleanup pass on its own timeline
    let shutdown = Shutdown::new();
    let scheduler = CleanupScheduler::new(products, payments, config.cleanup_interval);
    let scheduler_task = tokio::spawn(scheduler.run(shutdown.subscribe()));

    let addr = config.shopping_addr();
    tracing::info!("shopping gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    shutdown.trigger();
    if let Err(e) = scheduler_task.await {
        tracing::error!(error = %e, "Cleanup scheduler task failed");
    }
}
