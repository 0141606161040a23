//! Document store access.
//!
//! # Databases
//!
//! Two logical databases share one client connection pool:
//!
//! - `SHOPPING_DB_NAME` - holds the `products` collection
//! - `PAYMENT_DB_NAME` - holds the `payments` collection
//!
//! # Documents
//!
//! ```text
//! products: { _id: ObjectId, name: string, price: double }
//! payments: { _id: ObjectId, amount: double }
//! ```
//!
//! The store performs no validation of its own. Field constraints are
//! enforced by the service layer before anything is written, and documents
//! that fail them on the way back out are reported as
//! [`RepositoryError::DataCorruption`].

#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod payments;
pub mod products;

use std::time::Duration;

use bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub use payments::{MongoPaymentRepository, PaymentRepository};
pub use products::{MongoProductRepository, ProductRepository};

/// Name of the collection holding products.
pub const PRODUCTS_COLLECTION: &str = "products";

/// Name of the collection holding payments.
pub const PAYMENTS_COLLECTION: &str = "payments";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from the driver.
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// No document matched the given id.
    #[error("not found")]
    NotFound,
}

/// Handle to the document store.
///
/// Cheap to clone; all clones share the driver's connection pool, which is
/// safe for concurrent use.
#[derive(Debug, Clone)]
pub struct Store {
    client: Client,
}

impl Store {
    /// Create a client for the given connection URI.
    ///
    /// The driver connects lazily; call [`Store::ping`] to verify that the
    /// server is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI cannot be parsed or the client cannot be
    /// built.
    pub async fn connect(
        uri: &SecretString,
        app_name: &str,
    ) -> Result<Self, mongodb::error::Error> {
        let mut options = ClientOptions::parse(uri.expose_secret()).await?;
        options.app_name = Some(app_name.to_owned());
        options.server_selection_timeout = Some(Duration::from_secs(10));
        options.max_pool_size = Some(10);

        let client = Client::with_options(options)?;
        Ok(Self { client })
    }

    /// Get a typed collection in the named database.
    #[must_use]
    pub fn collection<T>(&self, database: &str, name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client.database(database).collection(name)
    }

    /// Check that the server answers commands on the named database.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable.
    pub async fn ping(&self, database: &str) -> Result<(), mongodb::error::Error> {
        self.client
            .database(database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
