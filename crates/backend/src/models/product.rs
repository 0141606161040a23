//! Product records and wire shapes.

use cartpay_core::{Price, ProductId, ProductName};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub price: Price,
}

/// Validated fields for creating or overwriting a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: ProductName,
    pub price: Price,
}

impl NewProduct {
    /// Attach a store-assigned id.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
        }
    }
}

/// Body of `POST /products` and `PUT /products/{id}`.
///
/// Missing fields deserialize to their empty values and are rejected by
/// validation, not by the JSON decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "cartpay_core::types::price::serde_float")]
    #[schema(value_type = f64, example = 9.99)]
    pub price: Decimal,
}

/// A product as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    #[schema(value_type = String, example = "65f1c0ffee0123456789abcd")]
    pub id: ProductId,
    pub name: String,
    #[serde(with = "cartpay_core::types::price::serde_float")]
    #[schema(value_type = f64, example = 9.99)]
    pub price: Decimal,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name.into_inner(),
            price: product.price.get(),
        }
    }
}
