//! Bearer-token interceptor for every payment RPC.

use std::sync::Arc;

use cartpay_backend::services::{AuthError, TokenIssuer};
use tonic::service::Interceptor;
use tonic::{Request, Status};

/// Metadata key carrying the token.
pub const AUTHORIZATION: &str = "authorization";

/// Rejects calls without a valid token with `Unauthenticated` and attaches
/// the verified claims to the request extensions.
#[derive(Debug, Clone)]
pub struct AuthInterceptor {
    tokens: Arc<TokenIssuer>,
}

impl AuthInterceptor {
    #[must_use]
    pub const fn new(tokens: Arc<TokenIssuer>) -> Self {
        Self { tokens }
    }
}

impl Interceptor for AuthInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let header = request
            .metadata()
            .get(AUTHORIZATION)
            .map(|value| value.to_str().map_err(|_| AuthError::InvalidToken))
            .transpose()
            .and_then(|header| self.tokens.validate_header(header));

        match header {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
                Ok(request)
            }
            Err(e) => {
                tracing::debug!(error = %e, "RPC call rejected");
                Err(Status::unauthenticated(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cartpay_backend::services::Claims;
    use secrecy::SecretString;

    fn interceptor() -> (AuthInterceptor, Arc<TokenIssuer>) {
        let tokens = Arc::new(TokenIssuer::new(&SecretString::from(
            "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%",
        )));
        (AuthInterceptor::new(tokens.clone()), tokens)
    }

    #[test]
    fn test_missing_metadata_is_unauthenticated() {
        let (mut interceptor, _) = interceptor();
        let status = interceptor.call(Request::new(())).unwrap_err();

        assert_eq!(status.code(), tonic::Code::Unauthenticated);
        assert_eq!(status.message(), "missing authorization token");
    }

    #[test]
    fn test_bad_token_is_unauthenticated() {
        let (mut interceptor, _) = interceptor();
        let mut request = Request::new(());
        request
            .metadata_mut()
            .insert(AUTHORIZATION, "Bearer nope".parse().unwrap());

        let status = interceptor.call(request).unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
        assert_eq!(status.message(), "invalid token");
    }

    #[test]
    fn test_valid_token_attaches_claims() {
        let (mut interceptor, tokens) = interceptor();
        let token = tokens.issue("u1").unwrap();

        for value in [format!("Bearer {token}"), token] {
            let mut request = Request::new(());
            request
                .metadata_mut()
                .insert(AUTHORIZATION, value.parse().unwrap());

            let request = interceptor.call(request).unwrap();
            assert_eq!(request.extensions().get::<Claims>().unwrap().user_id, "u1");
        }
    }
}
