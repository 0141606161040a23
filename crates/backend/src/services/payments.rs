//! Payment ledger service.

use std::sync::Arc;

use async_trait::async_trait;
use cartpay_core::{Amount, PaymentId};
use tracing::instrument;

use super::ServiceError;
use crate::db::{PaymentRepository, RepositoryError};
use crate::models::{NewPayment, PaymentRequest, PaymentResponse};

const NOT_FOUND: &str = "payment not found";

/// Payment operations exposed to the transports.
///
/// Payments cannot be updated.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Validate and record a payment.
    async fn create(&self, request: PaymentRequest) -> Result<PaymentResponse, ServiceError>;

    /// List every payment.
    async fn list(&self) -> Result<Vec<PaymentResponse>, ServiceError>;

    /// Fetch one payment by its hex id.
    async fn get(&self, id: &str) -> Result<PaymentResponse, ServiceError>;

    /// Remove a payment.
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
}

/// [`PaymentService`] backed by a [`PaymentRepository`].
#[derive(Clone)]
pub struct PaymentLedger {
    payments: Arc<dyn PaymentRepository>,
}

impl PaymentLedger {
    /// Create a ledger over the given repository.
    #[must_use]
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }
}

impl std::fmt::Debug for PaymentLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentLedger").finish_non_exhaustive()
    }
}

#[async_trait]
impl PaymentService for PaymentLedger {
    #[instrument(skip(self), fields(amount = %request.amount))]
    async fn create(&self, request: PaymentRequest) -> Result<PaymentResponse, ServiceError> {
        let amount = Amount::new(request.amount)?;
        let payment = self.payments.create(NewPayment { amount }).await?;
        tracing::info!(payment_id = %payment.id, "Payment created");
        Ok(payment.into())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<PaymentResponse>, ServiceError> {
        let payments = self.payments.find_all().await?;
        Ok(payments.into_iter().map(PaymentResponse::from).collect())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<PaymentResponse, ServiceError> {
        let id = PaymentId::parse(id)?;
        self.payments
            .find_by_id(id)
            .await?
            .map(PaymentResponse::from)
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = PaymentId::parse(id)?;
        self.payments.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => ServiceError::NotFound(NOT_FOUND.to_string()),
            other => ServiceError::Storage(other),
        })?;
        tracing::info!(payment_id = %id, "Payment deleted");
        Ok(())
    }
}
