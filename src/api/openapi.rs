//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, reservations, users};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
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
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblioteca API",
        version = "1.0.0",
        description = "Book catalogue and reservation REST API"
    ),
    paths(
        // Books
        books::create_book,
        books::list_books,
        books::get_book,
        books::update_book,
        books::disable_book,
        // Reservations
        reservations::reserve_book,
        reservations::book_history,
        reservations::user_history,
        // Users
        users::register,
        users::login,
        users::get_user,
        users::update_user,
        users::disable_user,
        // Health
        health::health_check,
        health::readiness_check,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookPage,
            crate::models::book::PageInfo,
            books::BookResponse,
            // Reservations
            crate::models::reservation::Reservation,
            crate::models::reservation::ReserveRequest,
            crate::models::reservation::BookHistory,
            crate::models::reservation::BookHistoryEntry,
            crate::models::reservation::UserHistory,
            crate::models::reservation::UserHistoryEntry,
            reservations::ReservationResponse,
            // Users
            crate::models::user::User,
            crate::models::user::UserSummary,
            crate::models::user::RegisterUser,
            crate::models::user::LoginRequest,
            crate::models::user::UpdateUser,
            crate::models::permission::Permission,
            crate::models::permission::PermissionSet,
            users::AuthResponse,
            users::UserResponse,
            // Common
            super::MessageResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "libros", description = "Book catalogue"),
        (name = "reservas", description = "Reservations"),
        (name = "usuarios", description = "User accounts"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
