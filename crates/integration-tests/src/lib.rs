//! Integration tests for Cartpay.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no external services needed)
//! cargo test -p cartpay-integration-tests
//!
//! # Live tests against running servers and MongoDB
//! cargo test -p cartpay-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `rest_api` - REST gateway router over in-memory repositories
//! - `payment_rpc` - gRPC service on an ephemeral port over in-memory repositories
//! - `live` - Both servers as deployed (`#[ignore]`d)
//!
//! This library holds the shared harness.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use cartpay_backend::Shutdown;
use cartpay_backend::db::memory::{InMemoryPaymentRepository, InMemoryProductRepository};
use cartpay_backend::services::{Claims, PaymentLedger, ProductCatalog, TokenIssuer};
use cartpay_payment::PaymentClient;
use cartpay_shopping::AppState;
use secrecy::SecretString;
use serde_json::Value;
use tokio::task::JoinHandle;
use tonic::transport::server::TcpIncoming;
use tower::ServiceExt;

/// Signing secret used by every in-process harness.
pub const TEST_SECRET: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

/// Build the token issuer shared by a harness.
#[must_use]
pub fn test_tokens() -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(&SecretString::from(TEST_SECRET)))
}

/// A token signed with [`TEST_SECRET`] whose expiry is a minute in the past.
#[must_use]
pub fn expired_token(user_id: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        user_id: user_id.to_owned(),
        iat: now - 7200,
        exp: now - 60,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to sign expired token")
}

/// A well-formed, unexpired token signed with a secret the servers do not
/// know.
#[must_use]
pub fn foreign_token(user_id: &str) -> String {
    TokenIssuer::new(&SecretString::from("Zq8!vN3@kR6#tW1$yH5%jM9^bX2&cF4*"))
        .issue(user_id)
        .expect("Failed to sign foreign token")
}

/// The REST gateway router wired to in-memory repositories.
pub struct TestApp {
    pub router: Router,
    pub products: Arc<InMemoryProductRepository>,
    pub payments: Arc<InMemoryPaymentRepository>,
    pub tokens: Arc<TokenIssuer>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// Build a fresh app with empty repositories.
    #[must_use]
    pub fn new() -> Self {
        let products = Arc::new(InMemoryProductRepository::new());
        let payments = Arc::new(InMemoryPaymentRepository::new());
        let tokens = test_tokens();

        let state = AppState::new(
            Arc::new(ProductCatalog::new(products.clone())),
            Arc::new(PaymentLedger::new(payments.clone())),
            tokens.clone(),
        );

        Self {
            router: cartpay_shopping::app(state),
            products,
            payments,
            tokens,
        }
    }

    /// Send a request and return the status and raw body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        (status, body.to_vec())
    }

    /// Send a JSON request, optionally authenticated, and decode the JSON
    /// response (`Value::Null` for an empty or non-JSON body).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let (status, bytes) = self
            .send(builder.body(body).expect("Failed to build request"))
            .await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Log in through `POST /api/v1/login` and return the token.
    pub async fn login(&self, user_id: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/v1/login",
                None,
                Some(serde_json::json!({ "user_id": user_id })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"]
            .as_str()
            .expect("login response has a token")
            .to_owned()
    }
}

/// The payment gRPC service running on an ephemeral local port.
pub struct RpcServer {
    pub addr: SocketAddr,
    pub payments: Arc<InMemoryPaymentRepository>,
    pub tokens: Arc<TokenIssuer>,
    shutdown: Shutdown,
    handle: JoinHandle<Result<(), tonic::transport::Error>>,
}

impl RpcServer {
    /// Start a server with an empty repository.
    pub async fn start() -> Self {
        let payments = Arc::new(InMemoryPaymentRepository::new());
        let tokens = test_tokens();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind ephemeral port");
        let addr = listener.local_addr().expect("listener has an address");
        let incoming =
            TcpIncoming::from_listener(listener, true, None).expect("Failed to accept on listener");

        let service = cartpay_payment::service(
            Arc::new(PaymentLedger::new(payments.clone())),
            tokens.clone(),
        );
        let shutdown = Shutdown::new();
        let stopped = Shutdown::wait(shutdown.subscribe());

        let reflection =
            cartpay_payment::reflection_service().expect("Failed to build reflection service");
        let handle = tokio::spawn(
            cartpay_payment::server_builder()
                .add_service(service)
                .add_service(reflection)
                .serve_with_incoming_shutdown(incoming, stopped),
        );

        Self {
            addr,
            payments,
            tokens,
            shutdown,
            handle,
        }
    }

    /// Connect a client without credentials.
    pub async fn client(&self) -> PaymentClient {
        PaymentClient::connect(format!("http://{}", self.addr))
            .await
            .expect("Failed to connect to payment server")
    }

    /// Connect a client authenticated as `user_id`.
    pub async fn client_as(&self, user_id: &str) -> PaymentClient {
        let token = self.tokens.issue(user_id).expect("Failed to issue token");
        self.client()
            .await
            .with_token(&token)
            .expect("token is valid metadata")
    }

    /// Stop the server and wait for it to exit.
    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle
            .await
            .expect("server task panicked")
            .expect("server exited with an error");
    }
}
