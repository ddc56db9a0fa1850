use crate::error::{AppError, AppResult};
use crate::middleware::auth::{current_user, AuthUser};
use crate::models::{ArticleModel, UserRole};
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::article::ArticleService;
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
pub struct CreateArticleRequest {
    /// Article title (1-250 characters)
    #[validate(length(min = 1, max = 250))]
    pub title: String,
    /// Article content (non-empty)
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateArticleRequest {
    /// Article ID; must match the path identifier
    pub id: i32,
    /// Article title (1-250 characters)
    #[validate(length(min = 1, max = 250))]
    pub title: String,
    /// Article content (non-empty)
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleResponse {
    /// Article ID
    pub id: i32,
    /// Article title
    pub title: String,
    /// Article content
    pub content: String,
    /// Publish timestamp
    pub publish_date: String,
    /// Author user ID
    pub author_id: i32,
}

impl From<ArticleModel> for ArticleResponse {
    fn from(a: ArticleModel) -> Self {
        Self {
            id: a.id,
            title: a.title,
            content: a.content,
            publish_date: a.publish_date.to_string(),
            author_id: a.author_id,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/articles",
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "List articles, newest first", body = PaginatedResponse<ArticleResponse>),
    ),
    tag = "articles"
)]
pub async fn list_articles(
    Extension(db): Extension<DatabaseConnection>,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let page = pagination.page();
    let per_page = pagination.per_page();

    let service = ArticleService::new(db);
    let (articles, total) = service.list(page, per_page).await?;

    let items: Vec<ArticleResponse> = articles.into_iter().map(ArticleResponse::from).collect();
    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/articles/{id}",
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article details", body = ArticleResponse),
        (status = 404, description = "Article not found", body = AppError),
    ),
    tag = "articles"
)]
pub async fn get_article(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = ArticleService::new(db);
    let article = service.get_by_id(id).await?;
    Ok(ApiResponse::ok(ArticleResponse::from(article)))
}

#[utoipa::path(
    post,
    path = "/api/v1/articles",
    security(("jwt_token" = [])),
    request_body = CreateArticleRequest,
    responses(
        (status = 200, description = "Article created", body = ArticleResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "articles"
)]
pub async fn create_article(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateArticleRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = ArticleService::new(db);
    let article = service
        .create(auth_user.user_id, &payload.title, &payload.content)
        .await?;

    Ok(ApiResponse::ok(ArticleResponse::from(article)))
}

#[utoipa::path(
    put,
    path = "/api/v1/articles/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Article ID")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Article updated", body = ArticleResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 403, description = "Not the author", body = AppError),
        (status = 404, description = "Not found or identifier mismatch", body = AppError),
        (status = 409, description = "Concurrent modification", body = AppError),
    ),
    tag = "articles"
)]
pub async fn update_article(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateArticleRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let actor = current_user(&db, &auth_user).await?;
    let is_admin = actor.role == UserRole::Admin;

    let service = ArticleService::new(db);
    let article = service
        .update(
            id,
            payload.id,
            actor.id,
            is_admin,
            &payload.title,
            &payload.content,
        )
        .await?;

    Ok(ApiResponse::ok(ArticleResponse::from(article)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/articles/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article deleted", body = String),
        (status = 403, description = "Not the author", body = AppError),
    ),
    tag = "articles"
)]
pub async fn delete_article(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&db, &auth_user).await?;
    let is_admin = actor.role == UserRole::Admin;

    let service = ArticleService::new(db);
    service.delete(id, actor.id, is_admin).await?;

    Ok(ApiResponse::ok("Article deleted"))
}
