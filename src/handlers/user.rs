use crate::error::{AppError, AppResult};
use crate::middleware::auth::{current_user, require_admin, AuthUser};
use crate::models::{UserModel, UserRole};
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::user::{AdminChanges, UserService};
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// User ID; must match the path identifier
    pub id: i32,
    /// Avatar URL (max 200 characters); omitting clears it
    #[validate(length(max = 200))]
    pub avatar_url: Option<String>,
    /// Bio (max 1000 characters); omitting clears it
    #[validate(length(max = 1000))]
    pub bio: Option<String>,
    /// New role (admin only)
    pub role: Option<UserRole>,
    /// Ban flag (admin only)
    pub is_banned: Option<bool>,
    /// Points counter (admin only)
    pub points: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    /// User ID
    pub id: i32,
    /// Username
    pub username: String,
    /// User role
    pub role: UserRole,
    /// Avatar URL
    pub avatar_url: Option<String>,
    /// Bio
    pub bio: Option<String>,
    /// Forum points
    pub points: i32,
    /// Whether the account is banned
    pub is_banned: bool,
    /// Registration timestamp
    pub registration_date: String,
}

impl From<UserModel> for UserResponse {
    fn from(u: UserModel) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
            avatar_url: u.avatar_url,
            bio: u.bio,
            points: u.points,
            is_banned: u.is_banned,
            registration_date: u.registration_date.to_string(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    security(("jwt_token" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "List users", body = PaginatedResponse<UserResponse>),
        (status = 403, description = "Admin only", body = AppError),
    ),
    tag = "users"
)]
pub async fn list_users(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let page = pagination.page();
    let per_page = pagination.per_page();

    let service = UserService::new(db);
    let (users, total) = service.list(page, per_page).await?;

    let items: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "Public user profile", body = UserResponse),
        (status = 404, description = "User not found", body = AppError),
    ),
    tag = "users"
)]
pub async fn get_user(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = UserService::new(db);
    let user = service.get_by_id(id).await?;
    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 403, description = "Not self or admin", body = AppError),
        (status = 404, description = "Not found or identifier mismatch", body = AppError),
        (status = 409, description = "Concurrent modification", body = AppError),
    ),
    tag = "users"
)]
pub async fn update_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let actor = current_user(&db, &auth_user).await?;
    let is_admin = actor.role == UserRole::Admin;

    let service = UserService::new(db);
    let user = service
        .update(
            id,
            payload.id,
            actor.id,
            is_admin,
            payload.avatar_url,
            payload.bio,
            AdminChanges {
                role: payload.role,
                is_banned: payload.is_banned,
                points: payload.points,
            },
        )
        .await?;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = String),
        (status = 403, description = "Admin only", body = AppError),
        (status = 409, description = "User still has content", body = AppError),
    ),
    tag = "users"
)]
pub async fn delete_user(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    require_admin(&db, &auth_user).await?;

    let service = UserService::new(db);
    service.delete(id).await?;

    Ok(ApiResponse::ok("User deleted"))
}
