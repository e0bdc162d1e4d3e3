//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, borrows, health};

/// Registers the bearer scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "0.1.0",
        description = "Library borrowing REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::replace_book,
        books::borrow_copy,
        books::return_copy,
        // Borrows
        borrows::list_borrows,
        borrows::create_borrow,
        borrows::delete_borrow,
        borrows::checkout,
        borrows::checkin,
    ),
    components(
        schemas(
            crate::models::book::Book,
            crate::models::book::BookInput,
            crate::models::book::BookQuery,
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::CreateBorrow,
            crate::models::borrow::BorrowQuery,
            borrows::CheckoutResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog and quantities"),
        (name = "borrows", description = "Borrow records")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
