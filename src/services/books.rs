//! Book catalog service

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Book, BookInput},
    repository::{LibraryStore, Replaced},
    services::policy::QuantityDelta,
};

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn LibraryStore>,
}

impl BooksService {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    /// List books, optionally restricted to one category
    pub async fn list(&self, category: Option<&str>) -> AppResult<Vec<Book>> {
        let category = category.filter(|c| !c.is_empty());
        self.store.list_books(category).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Book> {
        self.store.get_book(id).await
    }

    pub async fn create(&self, input: BookInput) -> AppResult<Book> {
        let book = self.store.insert_book(input.into_book(Uuid::new_v4())).await?;
        tracing::info!(book_id = %book.id, title = %book.title, "book created");
        Ok(book)
    }

    /// Replace every field of the book, inserting it when absent
    pub async fn replace(&self, id: Uuid, input: BookInput) -> AppResult<Replaced> {
        let replaced = self.store.replace_book(input.into_book(id)).await?;
        tracing::info!(book_id = %id, created = replaced.created, "book replaced");
        Ok(replaced)
    }

    /// Apply a unit quantity change with no inventory check
    pub async fn adjust(&self, id: Uuid, delta: QuantityDelta) -> AppResult<Book> {
        let book = self.store.adjust_quantity(id, delta).await?;
        tracing::info!(book_id = %id, delta = delta.value(), quantity = book.quantity, "quantity adjusted");
        Ok(book)
    }
}
