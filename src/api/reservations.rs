//! Reservation endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        reservation::{BookHistory, Reservation, ReserveRequest, UserHistory},
        user::VisibilityQuery,
    },
};

use super::AuthenticatedUser;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationResponse {
    pub message: String,
    pub reserva: Reservation,
}

/// Reserve a book for the authenticated user
#[utoipa::path(
    post,
    path = "/api/libros/reservar",
    tag = "reservas",
    security(("bearer_auth" = [])),
    request_body = ReserveRequest,
    responses(
        (status = 201, description = "Book reserved", body = ReservationResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found or disabled", body = crate::error::ErrorResponse),
        (status = 409, description = "Book is not available", body = crate::error::ErrorResponse)
    )
)]
pub async fn reserve_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    WithRejection(Json(request), _): WithRejection<Json<ReserveRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    let reservation = state
        .services
        .reservations
        .reserve(&actor, request.libro_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse {
            message: "Book reserved successfully".to_string(),
            reserva: reservation,
        }),
    ))
}

/// Reservation history of a book, newest first
#[utoipa::path(
    get,
    path = "/api/reservas/libro/{libro_id}",
    tag = "reservas",
    security(("bearer_auth" = [])),
    params(
        ("libro_id" = i32, Path, description = "Book ID"),
        VisibilityQuery
    ),
    responses(
        (status = 200, description = "Reservation history", body = BookHistory),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn book_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_actor): AuthenticatedUser,
    WithRejection(Path(book_id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Query(visibility), _): WithRejection<Query<VisibilityQuery>, AppError>,
) -> AppResult<Json<BookHistory>> {
    let history = state
        .services
        .reservations
        .history_for_book(book_id, visibility.include_disabled)
        .await?;
    Ok(Json(history))
}

/// Reservation history of a user, newest first
#[utoipa::path(
    get,
    path = "/api/reservas/usuario/{usuario_id}",
    tag = "reservas",
    security(("bearer_auth" = [])),
    params(
        ("usuario_id" = i32, Path, description = "User ID"),
        VisibilityQuery
    ),
    responses(
        (status = 200, description = "Reservation history", body = UserHistory),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn user_history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_actor): AuthenticatedUser,
    WithRejection(Path(user_id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Query(visibility), _): WithRejection<Query<VisibilityQuery>, AppError>,
) -> AppResult<Json<UserHistory>> {
    let history = state
        .services
        .reservations
        .history_for_user(user_id, visibility.include_disabled)
        .await?;
    Ok(Json(history))
}
