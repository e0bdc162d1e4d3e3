//! Data models for Libris

pub mod book;
pub mod borrow;

// Re-export commonly used types
pub use book::{Book, BookInput, BookQuery};
pub use borrow::{BorrowQuery, BorrowRecord, CreateBorrow};
