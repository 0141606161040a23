//! Protobuf messages of the `payment` package.
//!
//! Hand-maintained `prost` types matching `proto/payment.proto`; there is no
//! build-time codegen.

/// Fully-qualified service name.
pub const SERVICE_NAME: &str = "payment.PaymentService";

/// Request paths of the unary methods.
pub mod paths {
    pub const CREATE_PAYMENT: &str = "/payment.PaymentService/CreatePayment";
    pub const GET_ALL_PAYMENTS: &str = "/payment.PaymentService/GetAllPayments";
    pub const GET_PAYMENT_BY_ID: &str = "/payment.PaymentService/GetPaymentByID";
    pub const DELETE_PAYMENT: &str = "/payment.PaymentService/DeletePayment";
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct CreatePaymentRequest {
    #[prost(double, tag = "1")]
    pub amount: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PaymentResponse {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(double, tag = "2")]
    pub amount: f64,
}

#[derive(Clone, Copy, PartialEq, Eq, ::prost::Message)]
pub struct GetAllPaymentsRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetAllPaymentsResponse {
    #[prost(message, repeated, tag = "1")]
    pub payments: ::prost::alloc::vec::Vec<PaymentResponse>,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct GetPaymentByIdRequest {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct DeletePaymentRequest {
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct DeletePaymentResponse {
    #[prost(string, tag = "1")]
    pub message: ::prost::alloc::string::String,
}
