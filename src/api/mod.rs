//! API handlers for Libris REST endpoints

pub mod books;
pub mod borrows;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    services::identity::VerifiedIdentity,
    AppState,
};

/// Extractor for the caller's identity, proven by a bearer token
pub struct AuthenticatedUser(pub VerifiedIdentity);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let identity = state.verifier.verify(token).await?;
        Ok(AuthenticatedUser(identity))
    }
}

/// Parse a document id from a path segment; malformed ids are unknown documents
pub(crate) fn parse_id(raw: &str, kind: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("{} with id {} not found", kind, raw)))
}

/// Liveness probe
pub async fn root() -> &'static str {
    "Libris is lending books"
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/", get(root))
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/:id", get(books::get_book).put(books::replace_book))
        .route("/borrow/:id", patch(books::borrow_copy))
        .route("/return/:id", patch(books::return_copy))
        // Borrow records
        .route("/borrows", get(borrows::list_borrows).post(borrows::create_borrow))
        .route("/borrows/:id", delete(borrows::delete_borrow))
        .route("/checkouts", post(borrows::checkout))
        .route("/checkouts/:id", delete(borrows::checkin))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .merge(api)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
