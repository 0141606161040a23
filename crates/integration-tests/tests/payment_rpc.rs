//! Payment RPC tests against a server on an ephemeral port.
//!
//! Run with: `cargo test -p cartpay-integration-tests --test payment_rpc`

#![allow(clippy::unwrap_used)]

use cartpay_integration_tests::{RpcServer, expired_token, foreign_token};
use prost::Message;
use prost_types::FileDescriptorProto;
use tonic::Code;
use tonic::transport::Channel;
use tonic_reflection::pb::v1::server_reflection_client::ServerReflectionClient;
use tonic_reflection::pb::v1::server_reflection_request::MessageRequest;
use tonic_reflection::pb::v1::server_reflection_response::MessageResponse;
use tonic_reflection::pb::v1::ServerReflectionRequest;

async fn reflect(
    client: &mut ServerReflectionClient<Channel>,
    request: MessageRequest,
) -> Option<MessageResponse> {
    let request = ServerReflectionRequest {
        host: String::new(),
        message_request: Some(request),
    };
    let mut responses = client
        .server_reflection_info(futures::stream::iter([request]))
        .await
        .unwrap()
        .into_inner();
    responses
        .message()
        .await
        .unwrap()
        .and_then(|response| response.message_response)
}

#[tokio::test]
async fn test_calls_without_token_are_unauthenticated() {
    let server = RpcServer::start().await;
    let mut client = server.client().await;

    let status = client.get_all_payments().await.unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);
    assert_eq!(status.message(), "missing authorization token");

    let status = client.create_payment(10.0).await.unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);
    assert_eq!(server.payments.writes(), 0);

    server.stop().await;
}

#[tokio::test]
async fn test_garbage_token_is_unauthenticated() {
    let server = RpcServer::start().await;
    let mut client = server.client().await.with_token("garbage").unwrap();

    let status = client.get_payment_by_id("65f1c0ffee0123456789abcd").await.unwrap_err();
    assert_eq!(status.code(), Code::Unauthenticated);
    assert_eq!(status.message(), "invalid token");

    server.stop().await;
}

#[tokio::test]
async fn test_expired_and_foreign_tokens_are_unauthenticated() {
    let server = RpcServer::start().await;

    for token in [expired_token("u1"), foreign_token("u1")] {
        let mut client = server.client().await.with_token(&token).unwrap();

        let status = client.create_payment(10.0).await.unwrap_err();
        assert_eq!(status.code(), Code::Unauthenticated);
        assert_eq!(status.message(), "invalid token");

        let status = client.get_all_payments().await.unwrap_err();
        assert_eq!(status.code(), Code::Unauthenticated);
    }
    assert_eq!(server.payments.writes(), 0);

    server.stop().await;
}

#[tokio::test]
async fn test_payment_lifecycle() {
    let server = RpcServer::start().await;
    let mut client = server.client_as("u1").await;

    assert!(client.get_all_payments().await.unwrap().is_empty());

    let created = client.create_payment(100.5).await.unwrap();
    assert_eq!(created.amount, 100.5);
    assert_eq!(created.id.len(), 24);

    let fetched = client.get_payment_by_id(&created.id).await.unwrap();
    assert_eq!(fetched, created);

    let listed = client.get_all_payments().await.unwrap();
    assert_eq!(listed, vec![created.clone()]);

    let message = client.delete_payment(&created.id).await.unwrap();
    assert_eq!(message, "Payment deleted successfully");

    let status = client.get_payment_by_id(&created.id).await.unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    let status = client.delete_payment(&created.id).await.unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    server.stop().await;
}

#[tokio::test]
async fn test_invalid_amounts_are_rejected() {
    let server = RpcServer::start().await;
    let mut client = server.client_as("u1").await;

    for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let status = client.create_payment(amount).await.unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument, "amount {amount}");
    }
    assert_eq!(server.payments.writes(), 0);

    server.stop().await;
}

#[tokio::test]
async fn test_malformed_id_is_invalid_argument() {
    let server = RpcServer::start().await;
    let mut client = server.client_as("u1").await;

    let status = client.get_payment_by_id("nope").await.unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    let status = client.delete_payment("").await.unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    server.stop().await;
}

#[tokio::test]
async fn test_storage_failure_is_internal() {
    let server = RpcServer::start().await;
    let mut client = server.client_as("u1").await;
    server.payments.set_failing(true);

    let status = client.get_all_payments().await.unwrap_err();
    assert_eq!(status.code(), Code::Internal);
    assert_eq!(status.message(), "internal error");

    server.stop().await;
}

#[tokio::test]
async fn test_reflection_describes_service_without_token() {
    let server = RpcServer::start().await;
    let channel = Channel::from_shared(format!("http://{}", server.addr))
        .unwrap()
        .connect()
        .await
        .unwrap();
    let mut client = ServerReflectionClient::new(channel);

    let response = reflect(&mut client, MessageRequest::ListServices(String::new())).await;
    let Some(MessageResponse::ListServicesResponse(list)) = response else {
        panic!("unexpected reflection response: {response:?}");
    };
    assert!(list.service.iter().any(|s| s.name == "payment.PaymentService"));

    let response = reflect(
        &mut client,
        MessageRequest::FileContainingSymbol("payment.PaymentService".to_string()),
    )
    .await;
    let Some(MessageResponse::FileDescriptorResponse(files)) = response else {
        panic!("unexpected reflection response: {response:?}");
    };
    let file = FileDescriptorProto::decode(files.file_descriptor_proto[0].as_slice()).unwrap();
    assert_eq!(file.package(), "payment");
    let methods: Vec<&str> = file.service[0].method.iter().map(|m| m.name()).collect();
    assert_eq!(
        methods,
        ["CreatePayment", "GetAllPayments", "GetPaymentByID", "DeletePayment"]
    );

    drop(client);
    server.stop().await;
}
