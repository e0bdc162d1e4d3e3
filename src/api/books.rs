//! Book catalog endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{Book, BookInput, BookQuery},
    services::policy::QuantityDelta,
    AppState,
};

use super::{parse_id, AuthenticatedUser};

/// List books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Books, filtered by category when given", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    query: Result<Query<BookQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Book>>> {
    let Query(query) = query?;
    let books = state.services.books.list(query.category.as_deref()).await?;
    Ok(Json(books))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get(parse_id(&id, "Book")?).await?;
    Ok(Json(book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let Json(input) = payload?;
    let book = state.services.books.create(input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Replace a book, creating it when the id is unknown
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book replaced", body = Book),
        (status = 201, description = "Book created under the given id", body = Book),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 404, description = "Malformed book id", body = crate::error::ErrorResponse)
    )
)]
pub async fn replace_book(
    State(state): State<AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Path(id): Path<String>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let Json(input) = payload?;
    let replaced = state.services.books.replace(parse_id(&id, "Book")?, input).await?;
    let status = if replaced.created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(replaced.book)))
}

/// Take one copy off the shelf
#[utoipa::path(
    patch,
    path = "/borrow/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Quantity decremented", body = Book),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_copy(
    State(state): State<AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state
        .services
        .books
        .adjust(parse_id(&id, "Book")?, QuantityDelta::Borrow)
        .await?;
    Ok(Json(book))
}

/// Put one copy back on the shelf
#[utoipa::path(
    patch,
    path = "/return/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Quantity incremented", body = Book),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_copy(
    State(state): State<AppState>,
    AuthenticatedUser(_identity): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state
        .services
        .books
        .adjust(parse_id(&id, "Book")?, QuantityDelta::Return)
        .await?;
    Ok(Json(book))
}
