//! Product catalog service.

use std::sync::Arc;

use async_trait::async_trait;
use cartpay_core::{Price, ProductId, ProductName};
use tracing::instrument;

use super::ServiceError;
use crate::db::{ProductRepository, RepositoryError};
use crate::models::{NewProduct, ProductRequest, ProductResponse};

const NOT_FOUND: &str = "product not found";

/// Product operations exposed to the transports.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Validate and store a new product.
    async fn create(&self, request: ProductRequest) -> Result<ProductResponse, ServiceError>;

    /// List every product. An empty catalog is an empty list.
    async fn list(&self) -> Result<Vec<ProductResponse>, ServiceError>;

    /// Fetch one product by its hex id.
    async fn get(&self, id: &str) -> Result<ProductResponse, ServiceError>;

    /// Overwrite name and price of an existing product.
    async fn update(
        &self,
        id: &str,
        request: ProductRequest,
    ) -> Result<ProductResponse, ServiceError>;

    /// Remove a product.
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
}

/// [`ProductService`] backed by a [`ProductRepository`].
#[derive(Clone)]
pub struct ProductCatalog {
    products: Arc<dyn ProductRepository>,
}

impl ProductCatalog {
    /// Create a catalog over the given repository.
    #[must_use]
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }
}

impl std::fmt::Debug for ProductCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductCatalog").finish_non_exhaustive()
    }
}

fn validate(request: &ProductRequest) -> Result<NewProduct, ServiceError> {
    Ok(NewProduct {
        name: ProductName::parse(&request.name)?,
        price: Price::new(request.price)?,
    })
}

fn not_found(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::NotFound(NOT_FOUND.to_string()),
        other => ServiceError::Storage(other),
    }
}

#[async_trait]
impl ProductService for ProductCatalog {
    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn create(&self, request: ProductRequest) -> Result<ProductResponse, ServiceError> {
        let product = validate(&request)?;
        let product = self.products.create(product).await?;
        tracing::info!(product_id = %product.id, "Product created");
        Ok(product.into())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<ProductResponse>, ServiceError> {
        let products = self.products.find_all().await?;
        Ok(products.into_iter().map(ProductResponse::from).collect())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<ProductResponse, ServiceError> {
        let id = ProductId::parse(id)?;
        self.products
            .find_by_id(id)
            .await?
            .map(ProductResponse::from)
            .ok_or_else(|| ServiceError::NotFound(NOT_FOUND.to_string()))
    }

    #[instrument(skip(self, request))]
    async fn update(
        &self,
        id: &str,
        request: ProductRequest,
    ) -> Result<ProductResponse, ServiceError> {
        let id = ProductId::parse(id)?;
        let product = validate(&request)?;
        let product = self.products.update(id, product).await.map_err(not_found)?;
        tracing::info!(product_id = %product.id, "Product updated");
        Ok(product.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = ProductId::parse(id)?;
        self.products.delete(id).await.map_err(not_found)?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
