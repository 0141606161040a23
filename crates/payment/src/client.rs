//! Typed client for `payment.PaymentService`.

use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::metadata::{AsciiMetadataValue, errors::InvalidMetadataValue};
use tonic::transport::{Channel, Endpoint};
use tonic::{Request, Status};

use crate::interceptor::AUTHORIZATION;
use crate::proto::{
    CreatePaymentRequest, DeletePaymentRequest, DeletePaymentResponse, GetAllPaymentsRequest,
    GetPaymentByIdRequest, PaymentResponse, paths,
};

/// Client for the payment RPC service.
///
/// Every call carries the bearer token set with
/// [`PaymentClient::with_token`].
#[derive(Debug, Clone)]
pub struct PaymentClient {
    inner: tonic::client::Grpc<Channel>,
    token: Option<AsciiMetadataValue>,
}

impl PaymentClient {
    /// Connect to a payment service at `endpoint` (e.g. `http://localhost:9061`).
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid or unreachable.
    pub async fn connect(endpoint: impl Into<String>) -> Result<Self, tonic::transport::Error> {
        let channel = Endpoint::from_shared(endpoint.into())?.connect().await?;
        Ok(Self::new(channel))
    }

    /// Wrap an existing channel.
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
            token: None,
        }
    }

    /// Authenticate subsequent calls with `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not valid metadata.
    pub fn with_token(mut self, token: &str) -> Result<Self, InvalidMetadataValue> {
        self.token = Some(format!("Bearer {token}").parse()?);
        Ok(self)
    }

    async fn unary<Req, Resp>(&mut self, path: &'static str, message: Req) -> Result<Resp, Status>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unknown(format!("Service was not ready: {e}")))?;

        let mut request = Request::new(message);
        if let Some(token) = &self.token {
            request.metadata_mut().insert(AUTHORIZATION, token.clone());
        }

        let codec = ProstCodec::<Req, Resp>::default();
        let response = self
            .inner
            .unary(request, PathAndQuery::from_static(path), codec)
            .await?;
        Ok(response.into_inner())
    }

    /// Record a payment.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the server.
    pub async fn create_payment(&mut self, amount: f64) -> Result<PaymentResponse, Status> {
        self.unary(paths::CREATE_PAYMENT, CreatePaymentRequest { amount })
            .await
    }

    /// List every payment.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the server.
    pub async fn get_all_payments(&mut self) -> Result<Vec<PaymentResponse>, Status> {
        let response: crate::proto::GetAllPaymentsResponse = self
            .unary(paths::GET_ALL_PAYMENTS, GetAllPaymentsRequest {})
            .await?;
        Ok(response.payments)
    }

    /// Fetch one payment.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the server.
    pub async fn get_payment_by_id(&mut self, id: &str) -> Result<PaymentResponse, Status> {
        self.unary(
            paths::GET_PAYMENT_BY_ID,
            GetPaymentByIdRequest { id: id.to_owned() },
        )
        .await
    }

    /// Delete one payment and return the server's confirmation.
    ///
    /// # Errors
    ///
    /// Returns the status reported by the server.
    pub async fn delete_payment(&mut self, id: &str) -> Result<String, Status> {
        let response: DeletePaymentResponse = self
            .unary(paths::DELETE_PAYMENT, DeletePaymentRequest { id: id.to_owned() })
            .await?;
        Ok(response.message)
    }
}
