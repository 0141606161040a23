//! In-memory repositories for tests.
//!
//! Behave like the document store for everything the service layer can
//! observe: ids are fresh object ids, listing preserves insertion order,
//! update and delete report [`RepositoryError::NotFound`] when nothing
//! matches. Both repositories count writes and can be switched into a
//! failing mode to exercise storage-error paths.
//!
//! Enabled with the `testing` feature.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bson::oid::ObjectId;
use cartpay_core::{PaymentId, ProductId};

use super::{PaymentRepository, ProductRepository, RepositoryError};
use crate::models::{NewPayment, NewProduct, Payment, Product};

/// Shared bookkeeping for the in-memory repositories.
#[derive(Debug)]
struct Table<T> {
    rows: Mutex<Vec<T>>,
    writes: AtomicUsize,
    failing: AtomicBool,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            writes: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }
}

impl<T> Table<T> {
    fn rows(&self) -> MutexGuard<'_, Vec<T>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::DataCorruption(
                "simulated storage failure".to_string(),
            ));
        }
        Ok(())
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory [`ProductRepository`].
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    table: Table<Product>,
}

impl InMemoryProductRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes (create, update, delete).
    #[must_use]
    pub fn writes(&self) -> usize {
        self.table.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail with a storage error.
    pub fn set_failing(&self, failing: bool) {
        self.table.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        self.table.check()?;
        let product = product.with_id(ObjectId::new().into());
        self.table.rows().push(product.clone());
        self.table.record_write();
        Ok(product)
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        self.table.check()?;
        Ok(self.table.rows().clone())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        self.table.check()?;
        Ok(self.table.rows().iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: ProductId, product: NewProduct) -> Result<Product, RepositoryError> {
        self.table.check()?;
        let updated = {
            let mut rows = self.table.rows();
            let row = rows
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(RepositoryError::NotFound)?;
            *row = product.with_id(id);
            row.clone()
        };
        self.table.record_write();
        Ok(updated)
    }

    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        self.table.check()?;
        {
            let mut rows = self.table.rows();
            let before = rows.len();
            rows.retain(|p| p.id != id);
            if rows.len() == before {
                return Err(RepositoryError::NotFound);
            }
        }
        self.table.record_write();
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        self.table.check()?;
        Ok(self.table.rows().len() as u64)
    }
}

/// In-memory [`PaymentRepository`].
#[derive(Debug, Default)]
pub struct InMemoryPaymentRepository {
    table: Table<Payment>,
}

impl InMemoryPaymentRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes (create, delete).
    #[must_use]
    pub fn writes(&self) -> usize {
        self.table.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail with a storage error.
    pub fn set_failing(&self, failing: bool) {
        self.table.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn create(&self, payment: NewPayment) -> Result<Payment, RepositoryError> {
        self.table.check()?;
        let payment = payment.with_id(ObjectId::new().into());
        self.table.rows().push(payment);
        self.table.record_write();
        Ok(payment)
    }

    async fn find_all(&self) -> Result<Vec<Payment>, RepositoryError> {
        self.table.check()?;
        Ok(self.table.rows().clone())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepositoryError> {
        self.table.check()?;
        Ok(self.table.rows().iter().find(|p| p.id == id).copied())
    }

    async fn delete(&self, id: PaymentId) -> Result<(), RepositoryError> {
        self.table.check()?;
        {
            let mut rows = self.table.rows();
            let before = rows.len();
            rows.retain(|p| p.id != id);
            if rows.len() == before {
                return Err(RepositoryError::NotFound);
            }
        }
        self.table.record_write();
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        self.table.check()?;
        Ok(self.table.rows().len() as u64)
    }
}
