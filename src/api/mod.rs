//! API handlers for the Biblioteca REST endpoints

pub mod books;
pub mod health;
pub mod openapi;
pub mod reservations;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
    Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejectionReason,
    TypedHeader,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::{error::AppError, policy::Actor, AppState};

/// Extractor for the acting user behind a bearer token
pub struct AuthenticatedUser(pub Actor);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    let message = if matches!(rejection.reason(), TypedHeaderRejectionReason::Missing) {
                        "Missing authorization header"
                    } else {
                        "Invalid authorization header format"
                    };
                    AppError::Authentication(message.to_string())
                })?;

        let claims = state.services.credentials.validate_token(bearer.token())?;

        // The account may have been disabled after the token was issued
        let actor = state.services.users.resolve_actor(&claims).await?;

        Ok(AuthenticatedUser(actor))
    }
}

/// Acknowledgement without payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Books
        .route("/libros", get(books::list_books).post(books::create_book))
        .route("/libros/reservar", post(reservations::reserve_book))
        .route(
            "/libros/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::disable_book),
        )
        // Reservations
        .route("/reservas/libro/:libro_id", get(reservations::book_history))
        .route("/reservas/usuario/:usuario_id", get(reservations::user_history))
        // Users
        .route("/usuarios/registro", post(users::register))
        .route("/usuarios/login", post(users::login))
        .route(
            "/usuarios/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::disable_user),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", api)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
