//! Borrow record model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Association between a borrower and a borrowed book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub book_id: Uuid,
    pub borrower_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrower_name: Option<String>,
    pub borrowed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<DateTime<Utc>>,
}

/// Create borrow request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBorrow {
    pub book_id: Uuid,
    /// Must match the authenticated email when present
    #[serde(default)]
    pub borrower_email: Option<String>,
    #[serde(default)]
    pub borrower_name: Option<String>,
    #[serde(default)]
    pub return_date: Option<DateTime<Utc>>,
}

impl CreateBorrow {
    /// Build the record to persist for `borrower_email`
    pub fn into_record(self, borrower_email: String) -> BorrowRecord {
        BorrowRecord {
            id: Uuid::new_v4(),
            book_id: self.book_id,
            borrower_email,
            borrower_name: self.borrower_name,
            borrowed_at: Utc::now(),
            return_date: self.return_date,
        }
    }
}

/// Borrow listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BorrowQuery {
    /// Borrower whose records are listed; must equal the authenticated email
    pub email: Option<String>,
}
