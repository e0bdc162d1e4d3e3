//! Borrow record endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BorrowQuery, BorrowRecord, CreateBorrow},
    AppState,
};

use super::{parse_id, AuthenticatedUser};

/// Result of a checkout or checkin
#[derive(Serialize, ToSchema)]
pub struct CheckoutResponse {
    /// Borrow record created or removed
    pub borrow: BorrowRecord,
    /// Book with its quantity after the change
    pub book: Book,
}

/// List the authenticated borrower's records
#[utoipa::path(
    get,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(BorrowQuery),
    responses(
        (status = 200, description = "Borrow records of the borrower", body = Vec<BorrowRecord>),
        (status = 400, description = "Missing email parameter", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Email does not match the token", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_borrows(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    query: Result<Query<BorrowQuery>, QueryRejection>,
) -> AppResult<Json<Vec<BorrowRecord>>> {
    let Query(query) = query?;
    // Never fall back to an unscoped listing
    let email = query
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("email query parameter is required".to_string()))?;

    let records = state.services.borrows.list(&identity, &email).await?;
    Ok(Json(records))
}

/// Record a borrow, subject to the borrow limit
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = CreateBorrow,
    responses(
        (status = 201, description = "Borrow recorded", body = BorrowRecord),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Borrower email does not match the token", body = crate::error::ErrorResponse),
        (status = 409, description = "Borrow limit reached (legacy_limit_status = false)", body = crate::error::ErrorResponse),
        (status = 460, description = "Borrow limit reached", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_borrow(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    payload: Result<Json<CreateBorrow>, JsonRejection>,
) -> AppResult<(StatusCode, Json<BorrowRecord>)> {
    let Json(request) = payload?;
    let record = state.services.borrows.create(&identity, request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Delete a borrow record
#[utoipa::path(
    delete,
    path = "/borrows/{id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 204, description = "Borrow record deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Record belongs to another borrower", body = crate::error::ErrorResponse),
        (status = 404, description = "Borrow record not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_borrow(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state
        .services
        .borrows
        .delete(&identity, parse_id(&id, "Borrow record")?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record a borrow and decrement the book's quantity in one transaction
#[utoipa::path(
    post,
    path = "/checkouts",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = CreateBorrow,
    responses(
        (status = 201, description = "Checkout completed", body = CheckoutResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Borrower email does not match the token", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 460, description = "Borrow limit reached", body = crate::error::ErrorResponse)
    )
)]
pub async fn checkout(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    payload: Result<Json<CreateBorrow>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CheckoutResponse>)> {
    let Json(request) = payload?;
    let (borrow, book) = state.services.borrows.checkout(&identity, request).await?;
    Ok((StatusCode::CREATED, Json(CheckoutResponse { borrow, book })))
}

/// Delete a borrow record and increment the book's quantity in one transaction
#[utoipa::path(
    delete,
    path = "/checkouts/{id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Checkin completed", body = CheckoutResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 403, description = "Record belongs to another borrower", body = crate::error::ErrorResponse),
        (status = 404, description = "Borrow record or book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn checkin(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<CheckoutResponse>> {
    let (borrow, book) = state
        .services
        .borrows
        .checkin(&identity, parse_id(&id, "Borrow record")?)
        .await?;
    Ok(Json(CheckoutResponse { borrow, book }))
}
