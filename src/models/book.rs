//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Book document as stored in the `books` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    /// Matched case-insensitively by the listing filter
    pub category: String,
    /// Available copies. Not clamped: the legacy borrow endpoint can drive it negative.
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

/// Request body for inserting or replacing a book
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl BookInput {
    /// Materialize the input as a stored document under `id`
    pub fn into_book(self, id: Uuid) -> Book {
        Book {
            id,
            title: self.title,
            category: self.category,
            quantity: self.quantity,
            author: self.author,
            image: self.image,
            description: self.description,
            rating: self.rating,
        }
    }
}

/// Book listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Exact category, compared case-insensitively
    pub category: Option<String>,
}

/// Case-insensitive, full-string category comparison
pub fn category_matches(stored: &str, wanted: &str) -> bool {
    stored.to_lowercase() == wanted.to_lowercase()
}
