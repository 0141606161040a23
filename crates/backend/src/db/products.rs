//! Product repository.

use async_trait::async_trait;
use bson::doc;
use bson::oid::ObjectId;
use cartpay_core::{Price, ProductId, ProductName};
use mongodb::Collection;
use serde::{Deserialize, Serialize};

use super::{PRODUCTS_COLLECTION, RepositoryError, Store};
use crate::models::{NewProduct, Product};

/// Storage operations for products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product and return it with its assigned id.
    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError>;

    /// Return every stored product.
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Look up a product by id.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Overwrite the name and price of an existing product.
    ///
    /// Returns [`RepositoryError::NotFound`] if no product has this id.
    async fn update(&self, id: ProductId, product: NewProduct) -> Result<Product, RepositoryError>;

    /// Remove a product.
    ///
    /// Returns [`RepositoryError::NotFound`] if nothing was removed.
    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError>;

    /// Count stored products.
    async fn count(&self) -> Result<u64, RepositoryError>;
}

/// Stored shape of a product.
#[derive(Debug, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    price: f64,
}

impl ProductDocument {
    fn from_new(id: ObjectId, product: &NewProduct) -> Self {
        Self {
            id,
            name: product.name.as_str().to_owned(),
            price: product.price.as_f64(),
        }
    }

    fn into_product(self) -> Result<Product, RepositoryError> {
        let name = ProductName::parse(&self.name).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", self.id))
        })?;
        let price = Price::from_f64(self.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", self.id))
        })?;

        Ok(Product {
            id: self.id.into(),
            name,
            price,
        })
    }
}

/// Product repository backed by the `products` collection.
#[derive(Debug, Clone)]
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    /// Create a repository for the `products` collection of `database`.
    #[must_use]
    pub fn new(store: &Store, database: &str) -> Self {
        Self {
            collection: store.collection(database, PRODUCTS_COLLECTION),
        }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let id = ObjectId::new();
        self.collection
            .insert_one(ProductDocument::from_new(id, &product))
            .await?;
        Ok(product.with_id(id.into()))
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let mut cursor = self.collection.find(doc! {}).await?;

        let mut products = Vec::new();
        while cursor.advance().await? {
            products.push(cursor.deserialize_current()?.into_product()?);
        }
        Ok(products)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let oid = ObjectId::from(id);
        self.collection
            .find_one(doc! { "_id": oid })
            .await?
            .map(ProductDocument::into_product)
            .transpose()
    }

    async fn update(&self, id: ProductId, product: NewProduct) -> Result<Product, RepositoryError> {
        let oid = ObjectId::from(id);
        let update = doc! {
            "$set": {
                "name": product.name.as_str(),
                "price": product.price.as_f64(),
            }
        };

        let result = self
            .collection
            .update_one(doc! { "_id": oid }, update)
            .await?;
        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(product.with_id(id))
    }

    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let oid = ObjectId::from(id);
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        if result.deleted_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_document_roundtrip() {
        let new = NewProduct {
            name: ProductName::parse("Dried Mango").unwrap(),
            price: Price::new(Decimal::new(450, 2)).unwrap(),
        };
        let oid = ObjectId::new();

        let product = ProductDocument::from_new(oid, &new).into_product().unwrap();
        assert_eq!(product.id, ProductId::from(oid));
        assert_eq!(product.name, new.name);
        assert_eq!(product.price, new.price);
    }

    #[test]
    fn test_stored_price_reads_back_unchanged() {
        for raw in [100.123_456_789_012_34, 0.300_000_000_000_000_04, 19.999_999_999_999_996] {
            let new = NewProduct {
                name: ProductName::parse("Kiwi").unwrap(),
                price: Price::from_f64(raw).unwrap(),
            };
            let stored = bson::to_document(&ProductDocument::from_new(ObjectId::new(), &new)).unwrap();
            assert_eq!(stored.get_f64("price").unwrap().to_bits(), raw.to_bits());

            let product = bson::from_document::<ProductDocument>(stored)
                .unwrap()
                .into_product()
                .unwrap();
            assert_eq!(product.price, new.price);
            assert_eq!(product.price.to_string(), raw.to_string());
        }
    }

    #[test]
    fn test_invalid_document_is_data_corruption() {
        let doc = ProductDocument {
            id: ObjectId::new(),
            name: String::new(),
            price: 1.0,
        };
        assert!(matches!(
            doc.into_product(),
            Err(RepositoryError::DataCorruption(_))
        ));

        let doc = ProductDocument {
            id: ObjectId::new(),
            name: "Kiwi".to_string(),
            price: -3.0,
        };
        assert!(matches!(
            doc.into_product(),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_document_bson_shape() {
        let oid = ObjectId::new();
        let doc = bson::to_document(&ProductDocument {
            id: oid,
            name: "Kiwi".to_string(),
            price: 2.5,
        })
        .unwrap();

        assert_eq!(doc.get_object_id("_id").unwrap(), oid);
        assert_eq!(doc.get_str("name").unwrap(), "Kiwi");
        assert!((doc.get_f64("price").unwrap() - 2.5).abs() < f64::EPSILON);
    }
}
