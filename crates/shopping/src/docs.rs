//! OpenAPI document for the REST routes, served with Swagger UI.
//!
//! Both the UI and the raw document are public; the protected operations
//! declare the `bearer` scheme so the UI can attach a token.

use cartpay_backend::models::{PaymentRequest, PaymentResponse, ProductRequest, ProductResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ErrorResponse;
use crate::routes::auth::{LoginRequest, LoginResponse};
use crate::routes::{self, MessageResponse};

/// Where Swagger UI is mounted.
pub const SWAGGER_PATH: &str = "/swagger";

/// Where the OpenAPI JSON document is served.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Name of the bearer token security scheme.
pub const BEARER_SCHEME: &str = "bearer";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cartpay REST API",
        description = "Products and payments over JSON. Call /api/v1/login for a token."
    ),
    paths(
        routes::auth::login,
        routes::products::create,
        routes::products::list,
        routes::products::show,
        routes::products::update,
        routes::products::delete,
        routes::payments::create,
        routes::payments::list,
        routes::payments::show,
        routes::payments::delete,
    ),
    components(schemas(
        LoginRequest,
        LoginResponse,
        ProductRequest,
        ProductResponse,
        PaymentRequest,
        PaymentResponse,
        MessageResponse,
        ErrorResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Token issuance"),
        (name = "products", description = "Product catalog"),
        (name = "payments", description = "Recorded payments"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Swagger UI plus the document it renders.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(SWAGGER_PATH).url(OPENAPI_PATH, ApiDoc::openapi())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn operations(path: &str) -> Vec<&'static str> {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get(path).unwrap();
        [
            ("GET", item.get.is_some()),
            ("POST", item.post.is_some()),
            ("PUT", item.put.is_some()),
            ("DELETE", item.delete.is_some()),
        ]
        .into_iter()
        .filter_map(|(method, present)| present.then_some(method))
        .collect()
    }

    #[test]
    fn test_documents_every_route() {
        assert_eq!(operations("/api/v1/login"), ["POST"]);
        assert_eq!(operations("/api/v1/products"), ["GET", "POST"]);
        assert_eq!(operations("/api/v1/products/{id}"), ["GET", "PUT", "DELETE"]);
        assert_eq!(operations("/api/v1/payments"), ["GET", "POST"]);
        assert_eq!(operations("/api/v1/payments/{id}"), ["GET", "DELETE"]);
    }

    #[test]
    fn test_bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
        assert!(components.schemas.contains_key("PaymentResponse"));
        assert!(components.schemas.contains_key("ErrorResponse"));
    }
}
