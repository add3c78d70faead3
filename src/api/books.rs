//! Book catalogue endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookPage, BookQuery, CreateBook, UpdateBook},
        user::VisibilityQuery,
    },
};

use super::{AuthenticatedUser, MessageResponse};

/// A book with an acknowledgement message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub message: String,
    pub libro: Book,
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/api/libros",
    tag = "libros",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Requires crear_libros")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    WithRejection(Json(book), _): WithRejection<Json<CreateBook>, AppError>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let created = state.services.catalog.create_book(&actor, book).await?;
    Ok((
        StatusCode::CREATED,
        Json(BookResponse {
            message: "Book created successfully".to_string(),
            libro: created,
        }),
    ))
}

/// List books with filters and pagination
#[utoipa::path(
    get,
    path = "/api/libros",
    tag = "libros",
    params(BookQuery),
    responses(
        (status = 200, description = "Page of books", body = BookPage)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    WithRejection(Query(query), _): WithRejection<Query<BookQuery>, AppError>,
) -> AppResult<Json<BookPage>> {
    let page = state.services.catalog.list_books(&query).await?;
    Ok(Json(page))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/api/libros/{id}",
    tag = "libros",
    params(
        ("id" = i32, Path, description = "Book ID"),
        VisibilityQuery
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found or disabled", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Query(visibility), _): WithRejection<Query<VisibilityQuery>, AppError>,
) -> AppResult<Json<Book>> {
    let book = state
        .services
        .catalog
        .get_book(id, visibility.include_disabled)
        .await?;
    Ok(Json(book))
}

/// Update a book. Changing catalogue fields requires modificar_libros.
#[utoipa::path(
    put,
    path = "/api/libros/{id}",
    tag = "libros",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Requires modificar_libros"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(changes), _): WithRejection<Json<UpdateBook>, AppError>,
) -> AppResult<Json<BookResponse>> {
    changes.validate()?;

    let book = state.services.catalog.update_book(&actor, id, changes).await?;
    Ok(Json(BookResponse {
        message: "Book updated successfully".to_string(),
        libro: book,
    }))
}

/// Disable (soft delete) a book
#[utoipa::path(
    delete,
    path = "/api/libros/{id}",
    tag = "libros",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book disabled", body = MessageResponse),
        (status = 403, description = "Requires deshabilitar_libros"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn disable_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    state.services.catalog.disable_book(&actor, id).await?;
    Ok(Json(MessageResponse::new("Book disabled successfully")))
}
