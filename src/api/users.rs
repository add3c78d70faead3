//! User account endpoints

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
    models::user::{LoginRequest, RegisterUser, UpdateUser, User, UserSummary, VisibilityQuery},
};

use super::{AuthenticatedUser, MessageResponse};

/// Identity and bearer token returned by registration and login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub usuario: UserSummary,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub message: String,
    pub usuario: User,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/usuarios/registro",
    tag = "usuarios",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterUser>, AppError>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    request.validate()?;

    let (user, token) = state.services.users.register(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            usuario: UserSummary::from(&user),
            token,
        }),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/usuarios/login",
    tag = "usuarios",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials or disabled account", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AppError>,
) -> AppResult<Json<AuthResponse>> {
    request.validate()?;

    let (user, token) = state.services.users.login(request).await?;
    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        usuario: UserSummary::from(&user),
        token,
    }))
}

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    tag = "usuarios",
    params(
        ("id" = i32, Path, description = "User ID"),
        VisibilityQuery
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found or disabled", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Query(visibility), _): WithRejection<Query<VisibilityQuery>, AppError>,
) -> AppResult<Json<User>> {
    let user = state
        .services
        .users
        .get_user(id, visibility.include_disabled)
        .await?;
    Ok(Json(user))
}

/// Update a user (self, or modificar_usuarios)
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    tag = "usuarios",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Not allowed to modify this user"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateUser>, AppError>,
) -> AppResult<Json<UserResponse>> {
    request.validate()?;

    let user = state.services.users.update_user(&actor, id, request).await?;
    Ok(Json(UserResponse {
        message: "User updated successfully".to_string(),
        usuario: user,
    }))
}

/// Disable (soft delete) a user (self, or deshabilitar_usuarios)
#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    tag = "usuarios",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User disabled", body = MessageResponse),
        (status = 403, description = "Not allowed to disable this user"),
        (status = 404, description = "User not found")
    )
)]
pub async fn disable_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    state.services.users.disable_user(&actor, id).await?;
    Ok(Json(MessageResponse::new("User disabled successfully")))
}
