//! Borrow-limit policy and quantity deltas

use crate::{config::PolicyConfig, error::AppError};

/// Caps the number of simultaneous borrow records held by one borrower
#[derive(Debug, Clone, Copy)]
pub struct BorrowLimitPolicy {
    max_active: u32,
    legacy_status: bool,
}

impl BorrowLimitPolicy {
    pub fn new(max_active: u32, legacy_status: bool) -> Self {
        Self { max_active, legacy_status }
    }

    pub fn max_active(&self) -> u32 {
        self.max_active
    }

    /// Decide whether a borrower holding `active` records may take one more.
    ///
    /// Callers must hold the borrower's critical section between counting
    /// and inserting.
    pub fn admit(&self, active: i64) -> Result<(), AppError> {
        if active >= i64::from(self.max_active) {
            return Err(AppError::BorrowLimitExceeded {
                limit: self.max_active,
                legacy_status: self.legacy_status,
            });
        }
        Ok(())
    }
}

impl From<&PolicyConfig> for BorrowLimitPolicy {
    fn from(config: &PolicyConfig) -> Self {
        Self::new(config.max_active_borrows, config.legacy_limit_status)
    }
}

impl Default for BorrowLimitPolicy {
    fn default() -> Self {
        Self::from(&PolicyConfig::default())
    }
}

/// Unit change applied to a book's available quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityDelta {
    /// A copy leaves the shelf
    Borrow,
    /// A copy comes back
    Return,
}

impl QuantityDelta {
    pub fn value(self) -> i32 {
        match self {
            QuantityDelta::Borrow => -1,
            QuantityDelta::Return => 1,
        }
    }

    pub fn apply(self, quantity: i32) -> i32 {
        quantity.saturating_add(self.value())
    }
}
