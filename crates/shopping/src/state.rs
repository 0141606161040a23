//! Application state shared across handlers.

use std::sync::Arc;

use cartpay_backend::db::Store;
use cartpay_backend::services::{PaymentService, ProductService, TokenIssuer};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Services are held as trait objects so tests
/// can run the router over in-memory repositories.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    products: Arc<dyn ProductService>,
    payments: Arc<dyn PaymentService>,
    tokens: Arc<TokenIssuer>,
    readiness: Option<Readiness>,
}

/// Databases checked by the readiness probe.
struct Readiness {
    store: Store,
    databases: Vec<String>,
}

impl AppState {
    /// Create application state from its services.
    #[must_use]
    pub fn new(
        products: Arc<dyn ProductService>,
        payments: Arc<dyn PaymentService>,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                products,
                payments,
                tokens,
                readiness: None,
            }),
        }
    }

    /// Attach the store so `/health/ready` can ping `databases`.
    ///
    /// Without a store the readiness probe always succeeds.
    #[must_use]
    pub fn with_store(self, store: Store, databases: Vec<String>) -> Self {
        let inner = AppStateInner {
            products: self.inner.products.clone(),
            payments: self.inner.payments.clone(),
            tokens: self.inner.tokens.clone(),
            readiness: Some(Readiness { store, databases }),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Get the product service.
    #[must_use]
    pub fn products(&self) -> &dyn ProductService {
        self.inner.products.as_ref()
    }

    /// Get the payment service.
    #[must_use]
    pub fn payments(&self) -> &dyn PaymentService {
        self.inner.payments.as_ref()
    }

    /// Get the token issuer.
    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.inner.tokens
    }

    /// Ping every configured database.
    ///
    /// # Errors
    ///
    /// Returns the first driver error encountered.
    pub async fn check_ready(&self) -> Result<(), cartpay_backend::db::RepositoryError> {
        let Some(readiness) = &self.inner.readiness else {
            return Ok(());
        };
        for database in &readiness.databases {
            readiness.store.ping(database).await?;
        }
        Ok(())
    }
}
