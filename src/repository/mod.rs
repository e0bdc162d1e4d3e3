//! Repository layer: the document store behind the `books` and `borrows` collections

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, BorrowRecord},
    services::policy::{BorrowLimitPolicy, QuantityDelta},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Outcome of a replace-or-insert on a book
#[derive(Debug, Clone, PartialEq)]
pub struct Replaced {
    pub book: Book,
    /// `true` when no book existed under the id and one was inserted
    pub created: bool,
}

/// Storage operations over the two collections.
///
/// Single-document operations are atomic per call. `insert_borrow`,
/// `checkout` and `checkin` span several documents and must run under one
/// per-borrower critical section or transaction.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    async fn list_books(&self, category: Option<&str>) -> AppResult<Vec<Book>>;
    async fn get_book(&self, id: Uuid) -> AppResult<Book>;
    async fn insert_book(&self, book: Book) -> AppResult<Book>;
    async fn replace_book(&self, book: Book) -> AppResult<Replaced>;
    /// Add `delta` to the book's quantity in one atomic update
    async fn adjust_quantity(&self, id: Uuid, delta: QuantityDelta) -> AppResult<Book>;

    async fn list_borrows(&self, borrower_email: &str) -> AppResult<Vec<BorrowRecord>>;
    async fn get_borrow(&self, id: Uuid) -> AppResult<BorrowRecord>;
    /// Insert the record only if its borrower is admitted by `policy`
    async fn insert_borrow(
        &self,
        record: BorrowRecord,
        policy: &BorrowLimitPolicy,
    ) -> AppResult<BorrowRecord>;
    async fn delete_borrow(&self, id: Uuid) -> AppResult<()>;

    /// Limit check, record insert and quantity decrement, all or nothing
    async fn checkout(
        &self,
        record: BorrowRecord,
        policy: &BorrowLimitPolicy,
    ) -> AppResult<(BorrowRecord, Book)>;
    /// Record delete and quantity increment, all or nothing
    async fn checkin(&self, id: Uuid) -> AppResult<(BorrowRecord, Book)>;

    async fn health_check(&self) -> AppResult<()>;
    fn backend_name(&self) -> &'static str;
}

pub(crate) fn book_not_found(id: Uuid) -> crate::error::AppError {
    crate::error::AppError::NotFound(format!("Book with id {} not found", id))
}

pub(crate) fn borrow_not_found(id: Uuid) -> crate::error::AppError {
    crate::error::AppError::NotFound(format!("Borrow record with id {} not found", id))
}
