//! Business logic services

pub mod books;
pub mod borrows;
pub mod identity;
pub mod policy;

use std::sync::Arc;

use crate::{config::PolicyConfig, repository::LibraryStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub borrows: borrows::BorrowsService,
    store: Arc<dyn LibraryStore>,
}

impl Services {
    /// Create all services over the given store
    pub fn new(store: Arc<dyn LibraryStore>, policy_config: &PolicyConfig) -> Self {
        Self {
            books: books::BooksService::new(store.clone()),
            borrows: borrows::BorrowsService::new(store.clone(), policy::BorrowLimitPolicy::from(policy_config)),
            store,
        }
    }

    /// Store backend name, for diagnostics
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Check the store is reachable
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.store.health_check().await
    }
}
