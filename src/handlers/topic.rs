use crate::error::{AppError, AppResult};
use crate::middleware::auth::{current_user, AuthUser};
use crate::models::UserRole;
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::topic::{TopicDetail, TopicService};
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
pub struct CreateTopicRequest {
    /// Topic title (1-200 characters)
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Category the topic belongs to
    pub category_id: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTopicRequest {
    /// Topic ID; must match the path identifier
    pub id: i32,
    /// Topic title (1-200 characters)
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Category the topic belongs to
    pub category_id: i32,
    /// Whether the topic is closed to new messages
    pub is_closed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopicResponse {
    /// Topic ID
    pub id: i32,
    /// Topic title
    pub title: String,
    /// Category ID
    pub category_id: i32,
    /// Category name (joined)
    pub category_name: Option<String>,
    /// Author user ID
    pub author_id: i32,
    /// Author username (joined)
    pub author_name: Option<String>,
    /// Creation timestamp
    pub creation_date: String,
    /// Last activity timestamp
    pub last_activity_date: String,
    /// Whether the topic is closed
    pub is_closed: bool,
}

impl From<TopicDetail> for TopicResponse {
    fn from(d: TopicDetail) -> Self {
        Self {
            id: d.topic.id,
            title: d.topic.title,
            category_id: d.topic.category_id,
            category_name: d.category.map(|c| c.name),
            author_id: d.topic.author_id,
            author_name: d.author.map(|a| a.username),
            creation_date: d.topic.creation_date.to_string(),
            last_activity_date: d.topic.last_activity_date.to_string(),
            is_closed: d.topic.is_closed,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/topics",
    params(
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "List topics with author and category", body = PaginatedResponse<TopicResponse>),
    ),
    tag = "topics"
)]
pub async fn list_topics(
    Extension(db): Extension<DatabaseConnection>,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let page = pagination.page();
    let per_page = pagination.per_page();

    let service = TopicService::new(db);
    let (topics, total) = service.list(None, page, per_page).await?;

    let items: Vec<TopicResponse> = topics.into_iter().map(TopicResponse::from).collect();
    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}/topics",
    params(
        ("id" = i32, Path, description = "Category ID"),
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Topics in a category", body = PaginatedResponse<TopicResponse>),
    ),
    tag = "topics"
)]
pub async fn list_topics_in_category(
    Extension(db): Extension<DatabaseConnection>,
    Path(category_id): Path<i32>,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let page = pagination.page();
    let per_page = pagination.per_page();

    let service = TopicService::new(db);
    let (topics, total) = service.list(Some(category_id), page, per_page).await?;

    let items: Vec<TopicResponse> = topics.into_iter().map(TopicResponse::from).collect();
    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/topics/{id}",
    params(("id" = i32, Path, description = "Topic ID")),
    responses(
        (status = 200, description = "Topic details", body = TopicResponse),
        (status = 404, description = "Topic not found", body = AppError),
    ),
    tag = "topics"
)]
pub async fn get_topic(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = TopicService::new(db);
    let detail = service.get_detailed(id).await?;
    Ok(ApiResponse::ok(TopicResponse::from(detail)))
}

#[utoipa::path(
    post,
    path = "/api/v1/topics",
    security(("jwt_token" = [])),
    request_body = CreateTopicRequest,
    responses(
        (status = 200, description = "Topic created", body = TopicResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "topics"
)]
pub async fn create_topic(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateTopicRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = TopicService::new(db);
    let topic = service
        .create(auth_user.user_id, payload.category_id, &payload.title)
        .await?;
    let detail = service.get_detailed(topic.id).await?;

    Ok(ApiResponse::ok(TopicResponse::from(detail)))
}

#[utoipa::path(
    put,
    path = "/api/v1/topics/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Topic ID")),
    request_body = UpdateTopicRequest,
    responses(
        (status = 200, description = "Topic updated", body = TopicResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 403, description = "Not the author", body = AppError),
        (status = 404, description = "Not found or identifier mismatch", body = AppError),
        (status = 409, description = "Concurrent modification", body = AppError),
    ),
    tag = "topics"
)]
pub async fn update_topic(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTopicRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let actor = current_user(&db, &auth_user).await?;
    let is_admin = actor.role == UserRole::Admin;

    let service = TopicService::new(db);
    let topic = service
        .update(
            id,
            payload.id,
            actor.id,
            is_admin,
            &payload.title,
            payload.category_id,
            payload.is_closed,
        )
        .await?;
    let detail = service.get_detailed(topic.id).await?;

    Ok(ApiResponse::ok(TopicResponse::from(detail)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/topics/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Topic ID")),
    responses(
        (status = 200, description = "Topic deleted (messages cascade)", body = String),
        (status = 403, description = "Not the author", body = AppError),
    ),
    tag = "topics"
)]
pub async fn delete_topic(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&db, &auth_user).await?;
    let is_admin = actor.role == UserRole::Admin;

    let service = TopicService::new(db);
    service.delete(id, actor.id, is_admin).await?;

    Ok(ApiResponse::ok("Topic deleted"))
}
