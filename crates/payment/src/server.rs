//! Server glue for `payment.PaymentService`.
//!
//! Routes incoming HTTP/2 requests by path to the methods of a
//! [`PaymentRpc`] implementation, decoding and encoding with `prost`.
//! Unknown paths answer with `Unimplemented`.

use std::convert::Infallible;

use tonic::codegen::{Arc, Body, BoxFuture, Context, Poll, Service, StdError, empty_body, http};
use tonic::{Request, Response, Status};

use crate::proto::{
    CreatePaymentRequest, DeletePaymentRequest, DeletePaymentResponse, GetAllPaymentsRequest,
    GetAllPaymentsResponse, GetPaymentByIdRequest, PaymentResponse, SERVICE_NAME, paths,
};

/// Methods of the payment RPC service.
#[tonic::async_trait]
pub trait PaymentRpc: Send + Sync + 'static {
    async fn create_payment(
        &self,
        request: Request<CreatePaymentRequest>,
    ) -> Result<Response<PaymentResponse>, Status>;

    async fn get_all_payments(
        &self,
        request: Request<GetAllPaymentsRequest>,
    ) -> Result<Response<GetAllPaymentsResponse>, Status>;

    async fn get_payment_by_id(
        &self,
        request: Request<GetPaymentByIdRequest>,
    ) -> Result<Response<PaymentResponse>, Status>;

    async fn delete_payment(
        &self,
        request: Request<DeletePaymentRequest>,
    ) -> Result<Response<DeletePaymentResponse>, Status>;
}

/// Tower service exposing a [`PaymentRpc`] implementation over gRPC.
#[derive(Debug)]
pub struct PaymentServiceServer<T> {
    inner: Arc<T>,
}

impl<T> PaymentServiceServer<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl<T> Clone for PaymentServiceServer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> tonic::server::NamedService for PaymentServiceServer<T> {
    const NAME: &'static str = SERVICE_NAME;
}

type MethodFn<T, Req, Resp> = fn(Arc<T>, Request<Req>) -> BoxFuture<Response<Resp>, Status>;

/// One unary method bound to the shared implementation.
struct UnaryMethod<T, Req, Resp> {
    inner: Arc<T>,
    call: MethodFn<T, Req, Resp>,
}

impl<T, Req, Resp> tonic::server::UnaryService<Req> for UnaryMethod<T, Req, Resp>
where
    T: Send + Sync + 'static,
    Req: Send + 'static,
    Resp: Send + 'static,
{
    type Response = Resp;
    type Future = BoxFuture<Response<Resp>, Status>;

    fn call(&mut self, request: Request<Req>) -> Self::Future {
        (self.call)(Arc::clone(&self.inner), request)
    }
}

fn dispatch<T, Req, Resp, B>(
    inner: Arc<T>,
    call: MethodFn<T, Req, Resp>,
    req: http::Request<B>,
) -> BoxFuture<http::Response<tonic::body::BoxBody>, Infallible>
where
    T: Send + Sync + 'static,
    Req: prost::Message + Default + Send + 'static,
    Resp: prost::Message + Send + 'static,
    B: Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
{
    Box::pin(async move {
        let method = UnaryMethod { inner, call };
        let codec = tonic::codec::ProstCodec::<Resp, Req>::default();
        let mut grpc = tonic::server::Grpc::new(codec);
        Ok(grpc.unary(method, req).await)
    })
}

impl<T, B> Service<http::Request<B>> for PaymentServiceServer<T>
where
    T: PaymentRpc,
    B: Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
{
    type Response = http::Response<tonic::body::BoxBody>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let inner = Arc::clone(&self.inner);
        match req.uri().path() {
            paths::CREATE_PAYMENT => dispatch::<T, CreatePaymentRequest, PaymentResponse, B>(
                inner,
                |inner, request| Box::pin(async move { inner.create_payment(request).await }),
                req,
            ),
            paths::GET_ALL_PAYMENTS => dispatch::<T, GetAllPaymentsRequest, GetAllPaymentsResponse, B>(
                inner,
                |inner, request| Box::pin(async move { inner.get_all_payments(request).await }),
                req,
            ),
            paths::GET_PAYMENT_BY_ID => dispatch::<T, GetPaymentByIdRequest, PaymentResponse, B>(
                inner,
                |inner, request| Box::pin(async move { inner.get_payment_by_id(request).await }),
                req,
            ),
            paths::DELETE_PAYMENT => dispatch::<T, DeletePaymentRequest, DeletePaymentResponse, B>(
                inner,
                |inner, request| Box::pin(async move { inner.delete_payment(request).await }),
                req,
            ),
            _ => Box::pin(async move {
                let mut response = http::Response::new(empty_body());
                let headers = response.headers_mut();
                headers.insert(
                    Status::GRPC_STATUS,
                    (tonic::Code::Unimplemented as i32).into(),
                );
                headers.insert(
                    http::header::CONTENT_TYPE,
                    tonic::metadata::GRPC_CONTENT_TYPE,
                );
                Ok(response)
            }),
        }
    }
}
