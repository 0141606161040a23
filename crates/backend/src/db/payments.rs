//! Payment repository.

use async_trait::async_trait;
use bson::doc;
use bson::oid::ObjectId;
use cartpay_core::{Amount, PaymentId};
use mongodb::Collection;
use serde::{Deserialize, Serialize};

use super::{PAYMENTS_COLLECTION, RepositoryError, Store};
use crate::models::{NewPayment, Payment};

/// Storage operations for payments.
///
/// There is no update: a recorded payment is only ever read or removed.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a payment and return it with its assigned id.
    async fn create(&self, payment: NewPayment) -> Result<Payment, RepositoryError>;

    /// Return every stored payment.
    async fn find_all(&self) -> Result<Vec<Payment>, RepositoryError>;

    /// Look up a payment by id.
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepositoryError>;

    /// Remove a payment.
    ///
    /// Returns [`RepositoryError::NotFound`] if nothing was removed.
    async fn delete(&self, id: PaymentId) -> Result<(), RepositoryError>;

    /// Count stored payments.
    async fn count(&self) -> Result<u64, RepositoryError>;
}

/// Stored shape of a payment.
#[derive(Debug, Serialize, Deserialize)]
struct PaymentDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    amount: f64,
}

impl PaymentDocument {
    fn into_payment(self) -> Result<Payment, RepositoryError> {
        let amount = Amount::from_f64(self.amount).map_err(|e| {
            RepositoryError::DataCorruption(format!("payment {}: {e}", self.id))
        })?;
        Ok(Payment {
            id: self.id.into(),
            amount,
        })
    }
}

/// Payment repository backed by the `payments` collection.
#[derive(Debug, Clone)]
pub struct MongoPaymentRepository {
    collection: Collection<PaymentDocument>,
}

impl MongoPaymentRepository {
    /// Create a repository for the `payments` collection of `database`.
    #[must_use]
    pub fn new(store: &Store, database: &str) -> Self {
        Self {
            collection: store.collection(database, PAYMENTS_COLLECTION),
        }
    }
}

#[async_trait]
impl PaymentRepository for MongoPaymentRepository {
    async fn create(&self, payment: NewPayment) -> Result<Payment, RepositoryError> {
        let id = ObjectId::new();
        self.collection
            .insert_one(PaymentDocument {
                id,
                amount: payment.amount.as_f64(),
            })
            .await?;
        Ok(payment.with_id(id.into()))
    }

    async fn find_all(&self) -> Result<Vec<Payment>, RepositoryError> {
        let mut cursor = self.collection.find(doc! {}).await?;

        let mut payments = Vec::new();
        while cursor.advance().await? {
            payments.push(cursor.deserialize_current()?.into_payment()?);
        }
        Ok(payments)
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepositoryError> {
        let oid = ObjectId::from(id);
        self.collection
            .find_one(doc! { "_id": oid })
            .await?
            .map(PaymentDocument::into_payment)
            .transpose()
    }

    async fn delete(&self, id: PaymentId) -> Result<(), RepositoryError> {
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

    #[test]
    fn test_document_to_payment() {
        let oid = ObjectId::new();
        let payment = PaymentDocument {
            id: oid,
            amount: 100.5,
        }
        .into_payment()
        .unwrap();

        assert_eq!(payment.id.to_string(), oid.to_hex());
        assert!((payment.amount.as_f64() - 100.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stored_amount_reads_back_unchanged() {
        for raw in [100.123_456_789_012_34, 0.300_000_000_000_000_04, 19.999_999_999_999_996] {
            let created = Amount::from_f64(raw).unwrap();
            let stored = bson::to_document(&PaymentDocument {
                id: ObjectId::new(),
                amount: created.as_f64(),
            })
            .unwrap();

            let payment = bson::from_document::<PaymentDocument>(stored)
                .unwrap()
                .into_payment()
                .unwrap();
            assert_eq!(payment.amount, created);
            assert_eq!(payment.amount.as_f64().to_bits(), raw.to_bits());
        }
    }

    #[test]
    fn test_non_positive_amount_is_data_corruption() {
        let doc = PaymentDocument {
            id: ObjectId::new(),
            amount: 0.0,
        };
        assert!(matches!(
            doc.into_payment(),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
