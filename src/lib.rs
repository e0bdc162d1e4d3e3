//! Libris Library Borrowing Server
//!
//! A REST JSON API for a small lending library: a book catalog with
//! available quantities, per-borrower borrow records capped by a borrow
//! limit, and bearer-token authorization against a verified email claim.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::LibraryStore;
use services::identity::IdentityVerifier;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub verifier: Arc<dyn IdentityVerifier>,
}

impl AppState {
    /// Wire services over an explicit store and identity verifier
    pub fn new(
        config: AppConfig,
        store: Arc<dyn LibraryStore>,
        verifier: Arc<dyn IdentityVerifier>,
    ) -> Self {
        let services = services::Services::new(store, &config.policy);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
            verifier,
        }
    }
}
