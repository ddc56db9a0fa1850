use crate::error::{AppError, AppResult};
use crate::middleware::auth::{current_user, AuthUser};
use crate::models::{MessageModel, UserRole};
use crate::response::{ApiResponse, PaginatedResponse, PaginationQuery};
use crate::services::message::MessageService;
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
pub struct CreateMessageRequest {
    /// Topic the message belongs to
    pub topic_id: i32,
    /// Message content (non-empty)
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMessageRequest {
    /// Message ID; must match the path identifier
    pub id: i32,
    /// Message content (non-empty)
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Message ID
    pub id: i32,
    /// Topic ID
    pub topic_id: i32,
    /// Author user ID
    pub author_id: i32,
    /// Message content
    pub content: String,
    /// Creation timestamp
    pub creation_date: String,
    /// Whether the message was edited
    pub is_edited: bool,
    /// Edit timestamp, if edited
    pub edit_date: Option<String>,
}

impl From<MessageModel> for MessageResponse {
    fn from(m: MessageModel) -> Self {
        Self {
            id: m.id,
            topic_id: m.topic_id,
            author_id: m.author_id,
            content: m.content,
            creation_date: m.creation_date.to_string(),
            is_edited: m.is_edited,
            edit_date: m.edit_date.map(|d| d.to_string()),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/topics/{id}/messages",
    params(
        ("id" = i32, Path, description = "Topic ID"),
        ("page" = Option<u64>, Query, description = "Page number (1-based)"),
        ("per_page" = Option<u64>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Messages in a topic, oldest first", body = PaginatedResponse<MessageResponse>),
    ),
    tag = "messages"
)]
pub async fn list_messages(
    Extension(db): Extension<DatabaseConnection>,
    Path(topic_id): Path<i32>,
    Query(pagination): Query<PaginationQuery>,
) -> AppResult<impl IntoResponse> {
    let page = pagination.page();
    let per_page = pagination.per_page();

    let service = MessageService::new(db);
    let (messages, total) = service.list_by_topic(topic_id, page, per_page).await?;

    let items: Vec<MessageResponse> = messages.into_iter().map(MessageResponse::from).collect();
    Ok(ApiResponse::ok(PaginatedResponse::new(
        items, total, page, per_page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/messages/{id}",
    params(("id" = i32, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message details", body = MessageResponse),
        (status = 404, description = "Message not found", body = AppError),
    ),
    tag = "messages"
)]
pub async fn get_message(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = MessageService::new(db);
    let message = service.get_by_id(id).await?;
    Ok(ApiResponse::ok(MessageResponse::from(message)))
}

#[utoipa::path(
    post,
    path = "/api/v1/messages",
    security(("jwt_token" = [])),
    request_body = CreateMessageRequest,
    responses(
        (status = 200, description = "Message created", body = MessageResponse),
        (status = 400, description = "Validation error or topic closed", body = AppError),
        (status = 401, description = "Unauthorized", body = AppError),
    ),
    tag = "messages"
)]
pub async fn create_message(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<CreateMessageRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let service = MessageService::new(db);
    let message = service
        .create(payload.topic_id, auth_user.user_id, &payload.content)
        .await?;

    Ok(ApiResponse::ok(MessageResponse::from(message)))
}

#[utoipa::path(
    put,
    path = "/api/v1/messages/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Message ID")),
    request_body = UpdateMessageRequest,
    responses(
        (status = 200, description = "Message updated", body = MessageResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 403, description = "Not the author", body = AppError),
        (status = 404, description = "Not found or identifier mismatch", body = AppError),
        (status = 409, description = "Concurrent modification", body = AppError),
    ),
    tag = "messages"
)]
pub async fn update_message(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMessageRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let actor = current_user(&db, &auth_user).await?;
    let is_admin = actor.role == UserRole::Admin;

    let service = MessageService::new(db);
    let message = service
        .update(id, payload.id, actor.id, is_admin, &payload.content)
        .await?;

    Ok(ApiResponse::ok(MessageResponse::from(message)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/messages/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message deleted", body = String),
        (status = 403, description = "Not the author", body = AppError),
    ),
    tag = "messages"
)]
pub async fn delete_message(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let actor = current_user(&db, &auth_user).await?;
    let is_admin = actor.role == UserRole::Admin;

    let service = MessageService::new(db);
    service.delete(id, actor.id, is_admin).await?;

    Ok(ApiResponse::ok("Message deleted"))
}
