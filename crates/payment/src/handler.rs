//! Binds the payment RPC methods to the payment service.

use std::sync::Arc;

use cartpay_backend::models::{PaymentRequest, PaymentResponse};
use cartpay_backend::services::{Claims, PaymentService, ServiceError};
use cartpay_core::Amount;
use cartpay_core::types::price::decimal_to_f64;
use tonic::{Request, Response, Status};

use crate::proto;
use crate::server::PaymentRpc;

/// Confirmation returned by `DeletePayment`.
pub const DELETE_CONFIRMATION: &str = "Payment deleted successfully";

/// [`PaymentRpc`] implementation over a [`PaymentService`].
#[derive(Clone)]
pub struct PaymentHandler {
    payments: Arc<dyn PaymentService>,
}

impl std::fmt::Debug for PaymentHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentHandler").finish_non_exhaustive()
    }
}

impl PaymentHandler {
    #[must_use]
    pub fn new(payments: Arc<dyn PaymentService>) -> Self {
        Self { payments }
    }
}

/// Map a service error onto a gRPC status.
fn to_status(err: ServiceError) -> Status {
    match err {
        ServiceError::InvalidInput(msg) => Status::invalid_argument(msg),
        ServiceError::NotFound(msg) => Status::not_found(msg),
        ServiceError::Storage(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "RPC storage error");
            Status::internal("internal error")
        }
    }
}

fn to_message(payment: PaymentResponse) -> proto::PaymentResponse {
    proto::PaymentResponse {
        id: payment.id.to_string(),
        amount: decimal_to_f64(payment.amount),
    }
}

fn caller<T>(request: &Request<T>) -> &str {
    request
        .extensions()
        .get::<Claims>()
        .map_or("", |claims| claims.user_id.as_str())
}

#[tonic::async_trait]
impl PaymentRpc for PaymentHandler {
    async fn create_payment(
        &self,
        request: Request<proto::CreatePaymentRequest>,
    ) -> Result<Response<proto::PaymentResponse>, Status> {
        tracing::debug!(user_id = caller(&request), "CreatePayment");
        let amount = Amount::from_f64(request.into_inner().amount)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;

        let payment = self
            .payments
            .create(PaymentRequest {
                amount: amount.get(),
            })
            .await
            .map_err(to_status)?;
        Ok(Response::new(to_message(payment)))
    }

    async fn get_all_payments(
        &self,
        request: Request<proto::GetAllPaymentsRequest>,
    ) -> Result<Response<proto::GetAllPaymentsResponse>, Status> {
        tracing::debug!(user_id = caller(&request), "GetAllPayments");
        let payments = self.payments.list().await.map_err(to_status)?;
        Ok(Response::new(proto::GetAllPaymentsResponse {
            payments: payments.into_iter().map(to_message).collect(),
        }))
    }

    async fn get_payment_by_id(
        &self,
        request: Request<proto::GetPaymentByIdRequest>,
    ) -> Result<Response<proto::PaymentResponse>, Status> {
        tracing::debug!(user_id = caller(&request), "GetPaymentByID");
        let payment = self
            .payments
            .get(&request.into_inner().id)
            .await
            .map_err(to_status)?;
        Ok(Response::new(to_message(payment)))
    }

    async fn delete_payment(
        &self,
        request: Request<proto::DeletePaymentRequest>,
    ) -> Result<Response<proto::DeletePaymentResponse>, Status> {
        tracing::debug!(user_id = caller(&request), "DeletePayment");
        self.payments
            .delete(&request.into_inner().id)
            .await
            .map_err(to_status)?;
        Ok(Response::new(proto::DeletePaymentResponse {
            message: DELETE_CONFIRMATION.to_string(),
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cartpay_backend::db::memory::InMemoryPaymentRepository;
    use cartpay_backend::services::PaymentLedger;

    fn handler() -> (PaymentHandler, Arc<InMemoryPaymentRepository>) {
        let repo = Arc::new(InMemoryPaymentRepository::new());
        let ledger = Arc::new(PaymentLedger::new(repo.clone()));
        (PaymentHandler::new(ledger), repo)
    }

    async fn create(handler: &PaymentHandler, amount: f64) -> Result<proto::PaymentResponse, Status> {
        handler
            .create_payment(Request::new(proto::CreatePaymentRequest { amount }))
            .await
            .map(Response::into_inner)
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (handler, _) = handler();
        let created = create(&handler, 100.5).await.unwrap();
        assert_eq!(created.id.len(), 24);
        assert!((created.amount - 100.5).abs() < f64::EPSILON);

        let fetched = handler
            .get_payment_by_id(Request::new(proto::GetPaymentByIdRequest {
                id: created.id.clone(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_invalid_amounts_are_invalid_argument() {
        let (handler, repo) = handler();
        for amount in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let status = create(&handler, amount).await.unwrap_err();
            assert_eq!(status.code(), tonic::Code::InvalidArgument, "{amount}");
        }
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn test_amount_survives_create_and_get_unchanged() {
        let (handler, _) = handler();
        for raw in [100.123_456_789_012_34, 0.300_000_000_000_000_04, 19.999_999_999_999_996] {
            let created = create(&handler, raw).await.unwrap();
            assert_eq!(created.amount.to_bits(), raw.to_bits());

            let fetched = handler
                .get_payment_by_id(Request::new(proto::GetPaymentByIdRequest {
                    id: created.id.clone(),
                }))
                .await
                .unwrap()
                .into_inner();
            assert_eq!(fetched.amount.to_bits(), raw.to_bits());
        }
    }

    #[tokio::test]
    async fn test_unrepresentable_amounts_are_out_of_range() {
        let (handler, repo) = handler();
        for amount in [1e-30, 1e30] {
            let status = create(&handler, amount).await.unwrap_err();
            assert_eq!(status.code(), tonic::Code::InvalidArgument, "{amount}");
            assert_eq!(status.message(), "amount is out of range");
        }
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn test_get_status_codes() {
        let (handler, _) = handler();

        let status = handler
            .get_payment_by_id(Request::new(proto::GetPaymentByIdRequest {
                id: "bogus".to_string(),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        let status = handler
            .get_payment_by_id(Request::new(proto::GetPaymentByIdRequest {
                id: "65f1c0ffee0123456789abcd".to_string(),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::NotFound);
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let (handler, _) = handler();
        let created = create(&handler, 5.0).await.unwrap();

        let response = handler
            .delete_payment(Request::new(proto::DeletePaymentRequest {
                id: created.id.clone(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.message, DELETE_CONFIRMATION);

        let status = handler
            .delete_payment(Request::new(proto::DeletePaymentRequest { id: created.id }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::NotFound);
    }

    #[tokio::test]
    async fn test_list_and_storage_failure() {
        let (handler, repo) = handler();
        let all = handler
            .get_all_payments(Request::new(proto::GetAllPaymentsRequest {}))
            .await
            .unwrap()
            .into_inner();
        assert!(all.payments.is_empty());

        repo.set_failing(true);
        let status = handler
            .get_all_payments(Request::new(proto::GetAllPaymentsRequest {}))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::Internal);
    }
}
