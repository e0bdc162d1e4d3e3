//! Borrow record service

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, BorrowRecord, CreateBorrow},
    repository::LibraryStore,
    services::{identity::VerifiedIdentity, policy::BorrowLimitPolicy},
};

#[derive(Clone)]
pub struct BorrowsService {
    store: Arc<dyn LibraryStore>,
    policy: BorrowLimitPolicy,
}

impl BorrowsService {
    pub fn new(store: Arc<dyn LibraryStore>, policy: BorrowLimitPolicy) -> Self {
        Self { store, policy }
    }

    /// List the records held by `requested_email`, which must be the caller
    pub async fn list(
        &self,
        identity: &VerifiedIdentity,
        requested_email: &str,
    ) -> AppResult<Vec<BorrowRecord>> {
        identity.require_email(requested_email)?;
        self.store.list_borrows(&identity.email).await
    }

    /// Record a borrow for the caller when the borrow limit admits it
    pub async fn create(
        &self,
        identity: &VerifiedIdentity,
        request: CreateBorrow,
    ) -> AppResult<BorrowRecord> {
        let record = self.admit_record(identity, request)?;

        match self.store.insert_borrow(record, &self.policy).await {
            Ok(record) => {
                tracing::info!(borrow_id = %record.id, book_id = %record.book_id, borrower = %record.borrower_email, "borrow recorded");
                Ok(record)
            }
            Err(e) => {
                tracing::info!(borrower = %identity.email, error = %e, "borrow refused");
                Err(e)
            }
        }
    }

    /// Remove one of the caller's records
    pub async fn delete(&self, identity: &VerifiedIdentity, id: Uuid) -> AppResult<()> {
        let record = self.store.get_borrow(id).await?;
        identity.require_email(&record.borrower_email)?;

        self.store.delete_borrow(id).await?;
        tracing::info!(borrow_id = %id, borrower = %identity.email, "borrow record deleted");
        Ok(())
    }

    /// Record a borrow and take a copy off the shelf in one unit
    pub async fn checkout(
        &self,
        identity: &VerifiedIdentity,
        request: CreateBorrow,
    ) -> AppResult<(BorrowRecord, Book)> {
        let record = self.admit_record(identity, request)?;
        let (record, book) = self.store.checkout(record, &self.policy).await?;

        tracing::info!(
            borrow_id = %record.id,
            book_id = %book.id,
            quantity = book.quantity,
            "checkout completed"
        );
        Ok((record, book))
    }

    /// Delete one of the caller's records and put the copy back in one unit
    pub async fn checkin(&self, identity: &VerifiedIdentity, id: Uuid) -> AppResult<(BorrowRecord, Book)> {
        let record = self.store.get_borrow(id).await?;
        identity.require_email(&record.borrower_email)?;

        let (record, book) = self.store.checkin(id).await?;
        tracing::info!(
            borrow_id = %record.id,
            book_id = %book.id,
            quantity = book.quantity,
            "checkin completed"
        );
        Ok((record, book))
    }

    /// The borrower is always the verified identity; a body email may only confirm it
    fn admit_record(&self, identity: &VerifiedIdentity, request: CreateBorrow) -> AppResult<BorrowRecord> {
        if let Some(email) = request.borrower_email.as_deref() {
            identity.require_email(email)?;
        }
        Ok(request.into_record(identity.email.clone()))
    }
}
