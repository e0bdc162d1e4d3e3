//! In-memory backend.
//!
//! Both collections live behind a single `tokio::sync::RwLock`, so every
//! multi-document operation is atomic by holding the write guard across it.
//! Nothing is durable; state is lost on restart. Used for local development
//! (`database.backend = "memory"`) and tests.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{book_not_found, borrow_not_found, LibraryStore, Replaced};
use crate::{
    error::AppResult,
    models::{book::category_matches, Book, BorrowRecord},
    services::policy::{BorrowLimitPolicy, QuantityDelta},
};

#[derive(Default)]
struct Collections {
    // insertion order
    books: Vec<Book>,
    borrows: Vec<BorrowRecord>,
}

impl Collections {
    fn book_mut(&mut self, id: Uuid) -> AppResult<&mut Book> {
        self.books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| book_not_found(id))
    }

    fn active_borrows(&self, borrower_email: &str) -> i64 {
        self.borrows
            .iter()
            .filter(|r| r.borrower_email == borrower_email)
            .count() as i64
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LibraryStore for MemoryStore {
    async fn list_books(&self, category: Option<&str>) -> AppResult<Vec<Book>> {
        let state = self.inner.read().await;
        Ok(state
            .books
            .iter()
            .filter(|b| category.map_or(true, |c| category_matches(&b.category, c)))
            .cloned()
            .collect())
    }

    async fn get_book(&self, id: Uuid) -> AppResult<Book> {
        let state = self.inner.read().await;
        state
            .books
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| book_not_found(id))
    }

    async fn insert_book(&self, book: Book) -> AppResult<Book> {
        let mut state = self.inner.write().await;
        state.books.push(book.clone());
        Ok(book)
    }

    async fn replace_book(&self, book: Book) -> AppResult<Replaced> {
        let mut state = self.inner.write().await;
        match state.books.iter_mut().find(|b| b.id == book.id) {
            Some(existing) => {
                *existing = book.clone();
                Ok(Replaced { book, created: false })
            }
            None => {
                state.books.push(book.clone());
                Ok(Replaced { book, created: true })
            }
        }
    }

    async fn adjust_quantity(&self, id: Uuid, delta: QuantityDelta) -> AppResult<Book> {
        let mut state = self.inner.write().await;
        let book = state.book_mut(id)?;
        book.quantity = delta.apply(book.quantity);
        Ok(book.clone())
    }

    async fn list_borrows(&self, borrower_email: &str) -> AppResult<Vec<BorrowRecord>> {
        let state = self.inner.read().await;
        Ok(state
            .borrows
            .iter()
            .filter(|r| r.borrower_email == borrower_email)
            .cloned()
            .collect())
    }

    async fn get_borrow(&self, id: Uuid) -> AppResult<BorrowRecord> {
        let state = self.inner.read().await;
        state
            .borrows
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| borrow_not_found(id))
    }

    async fn insert_borrow(
        &self,
        record: BorrowRecord,
        policy: &BorrowLimitPolicy,
    ) -> AppResult<BorrowRecord> {
        let mut state = self.inner.write().await;
        policy.admit(state.active_borrows(&record.borrower_email))?;
        state.borrows.push(record.clone());
        Ok(record)
    }

    async fn delete_borrow(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.inner.write().await;
        let before = state.borrows.len();
        state.borrows.retain(|r| r.id != id);
        if state.borrows.len() == before {
            return Err(borrow_not_found(id));
        }
        Ok(())
    }

    async fn checkout(
        &self,
        record: BorrowRecord,
        policy: &BorrowLimitPolicy,
    ) -> AppResult<(BorrowRecord, Book)> {
        let mut state = self.inner.write().await;
        policy.admit(state.active_borrows(&record.borrower_email))?;

        // validate the book before touching either collection
        let book = state.book_mut(record.book_id)?;
        book.quantity = QuantityDelta::Borrow.apply(book.quantity);
        let book = book.clone();

        state.borrows.push(record.clone());
        Ok((record, book))
    }

    async fn checkin(&self, id: Uuid) -> AppResult<(BorrowRecord, Book)> {
        let mut state = self.inner.write().await;
        let position = state
            .borrows
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| borrow_not_found(id))?;
        let book_id = state.borrows[position].book_id;

        let book = state.book_mut(book_id)?;
        book.quantity = QuantityDelta::Return.apply(book.quantity);
        let book = book.clone();

        let record = state.borrows.remove(position);
        Ok((record, book))
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
