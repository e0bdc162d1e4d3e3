//! Error types for Libris server

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Non-standard status historically used by clients to detect a borrow-limit rejection
pub const LEGACY_LIMIT_STATUS: u16 = 460;

/// Stable error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchDocument = 5,
    MaxBorrowsReached = 11,
    BadValue = 18,
    NoSuchData = 20,
    StoreUnavailable = 22,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Borrow limit of {limit} reached")]
    BorrowLimitExceeded { limit: u32, legacy_status: bool },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    /// HTTP status this error is answered with
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::BorrowLimitExceeded { legacy_status: true, .. } => {
                StatusCode::from_u16(LEGACY_LIMIT_STATUS).unwrap_or(StatusCode::CONFLICT)
            }
            AppError::BorrowLimitExceeded { legacy_status: false, .. } => StatusCode::CONFLICT,
            AppError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            AppError::Authentication(msg) | AppError::Authorization(msg) => {
                (ErrorCode::NotAuthorized, msg.clone())
            }
            AppError::NotFound(msg) => (ErrorCode::NoSuchDocument, msg.clone()),
            AppError::BadRequest(msg) => (ErrorCode::BadValue, msg.clone()),
            AppError::BorrowLimitExceeded { limit, .. } => (
                ErrorCode::MaxBorrowsReached,
                format!("You cannot borrow more than {} books at a time", limit),
            ),
            AppError::Database(sqlx::Error::RowNotFound) => {
                (ErrorCode::NoSuchData, "Document not found".to_string())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (ErrorCode::DbFailure, "Database error".to_string())
            }
            AppError::StoreUnavailable(msg) => {
                tracing::warn!("Store unavailable: {}", msg);
                (ErrorCode::StoreUnavailable, "Store unavailable".to_string())
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
