use crate::{
    error::{AppError, AppResult},
    models::{message, Message, MessageModel, Topic},
    services::topic::TopicService,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

pub struct MessageService {
    db: DatabaseConnection,
}

impl MessageService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_by_topic(
        &self,
        topic_id: i32,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<MessageModel>, u64)> {
        let paginator = Message::find()
            .filter(message::Column::TopicId.eq(topic_id))
            .order_by_asc(message::Column::CreationDate)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let messages = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((messages, total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<MessageModel> {
        Message::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn create(
        &self,
        topic_id: i32,
        author_id: i32,
        content: &str,
    ) -> AppResult<MessageModel> {
        let topic = Topic::find_by_id(topic_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::Validation("Topic does not exist".to_string()))?;

        if topic.is_closed {
            return Err(AppError::Validation("Topic is closed".to_string()));
        }

        let now = chrono::Utc::now().naive_utc();

        let new_message = message::ActiveModel {
            topic_id: Set(topic_id),
            author_id: Set(author_id),
            content: Set(content.to_string()),
            creation_date: Set(now),
            is_edited: Set(false),
            edit_date: Set(None),
            row_version: Set(0),
            ..Default::default()
        };

        let message = new_message.insert(&self.db).await?;

        // A new message counts as activity on its topic.
        TopicService::new(self.db.clone())
            .touch_activity(topic_id)
            .await?;

        Ok(message)
    }

    pub async fn update(
        &self,
        id: i32,
        payload_id: i32,
        actor_id: i32,
        actor_is_admin: bool,
        content: &str,
    ) -> AppResult<MessageModel> {
        if id != payload_id {
            return Err(AppError::NotFound);
        }

        let existing = self.get_by_id(id).await?;
        if existing.author_id != actor_id && !actor_is_admin {
            return Err(AppError::Forbidden);
        }

        let now = chrono::Utc::now().naive_utc();

        let active = message::ActiveModel {
            content: Set(content.to_string()),
            is_edited: Set(true),
            edit_date: Set(Some(now)),
            row_version: Set(existing.row_version + 1),
            ..Default::default()
        };

        let result = Message::update_many()
            .set(active)
            .filter(message::Column::Id.eq(id))
            .filter(message::Column::RowVersion.eq(existing.row_version))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return match Message::find_by_id(id).one(&self.db).await? {
                None => Err(AppError::NotFound),
                Some(_) => Err(AppError::ConcurrencyConflict),
            };
        }

        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: i32, actor_id: i32, actor_is_admin: bool) -> AppResult<()> {
        let Some(existing) = Message::find_by_id(id).one(&self.db).await? else {
            return Ok(());
        };

        if existing.author_id != actor_id && !actor_is_admin {
            return Err(AppError::Forbidden);
        }

        Message::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
