use crate::{
    error::{AppError, AppResult},
    models::{topic, Category, CategoryModel, Topic, TopicModel, User, UserModel},
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use std::collections::HashMap;

/// A topic together with its eagerly-loaded author and category rows.
/// Either side may be absent only if it vanished between queries.
pub struct TopicDetail {
    pub topic: TopicModel,
    pub author: Option<UserModel>,
    pub category: Option<CategoryModel>,
}

pub struct TopicService {
    db: DatabaseConnection,
}

impl TopicService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        category_id: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<TopicDetail>, u64)> {
        let mut query = Topic::find().order_by_desc(topic::Column::LastActivityDate);

        if let Some(category_id) = category_id {
            query = query.filter(topic::Column::CategoryId.eq(category_id));
        }

        let paginator = query.paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let topics = paginator.fetch_page(page.saturating_sub(1)).await?;

        let details = self.attach_refs(topics).await?;
        Ok((details, total))
    }

    pub async fn get_detailed(&self, id: i32) -> AppResult<TopicDetail> {
        let topic = self.get_by_id(id).await?;
        let mut details = self.attach_refs(vec![topic]).await?;
        details.pop().ok_or(AppError::NotFound)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<TopicModel> {
        Topic::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn create(
        &self,
        author_id: i32,
        category_id: i32,
        title: &str,
    ) -> AppResult<TopicModel> {
        // Validate the category before hitting the FK so the caller gets a
        // field-level error instead of a bare constraint failure.
        if Category::find_by_id(category_id).one(&self.db).await?.is_none() {
            return Err(AppError::Validation("Category does not exist".to_string()));
        }

        let now = chrono::Utc::now().naive_utc();

        let new_topic = topic::ActiveModel {
            title: Set(title.to_string()),
            category_id: Set(category_id),
            author_id: Set(author_id),
            creation_date: Set(now),
            last_activity_date: Set(now),
            is_closed: Set(false),
            row_version: Set(0),
            ..Default::default()
        };

        let topic = new_topic.insert(&self.db).await?;
        Ok(topic)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: i32,
        payload_id: i32,
        actor_id: i32,
        actor_is_admin: bool,
        title: &str,
        category_id: i32,
        is_closed: bool,
    ) -> AppResult<TopicModel> {
        if id != payload_id {
            return Err(AppError::NotFound);
        }

        let existing = self.get_by_id(id).await?;
        if existing.author_id != actor_id && !actor_is_admin {
            return Err(AppError::Forbidden);
        }

        if Category::find_by_id(category_id).one(&self.db).await?.is_none() {
            return Err(AppError::Validation("Category does not exist".to_string()));
        }

        let active = topic::ActiveModel {
            title: Set(title.to_string()),
            category_id: Set(category_id),
            is_closed: Set(is_closed),
            row_version: Set(existing.row_version + 1),
            ..Default::default()
        };

        let result = Topic::update_many()
            .set(active)
            .filter(topic::Column::Id.eq(id))
            .filter(topic::Column::RowVersion.eq(existing.row_version))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return match Topic::find_by_id(id).one(&self.db).await? {
                None => Err(AppError::NotFound),
                Some(_) => Err(AppError::ConcurrencyConflict),
            };
        }

        self.get_by_id(id).await
    }

    /// Delete a topic. Its messages go with it (cascade).
    pub async fn delete(&self, id: i32, actor_id: i32, actor_is_admin: bool) -> AppResult<()> {
        let Some(existing) = Topic::find_by_id(id).one(&self.db).await? else {
            return Ok(());
        };

        if existing.author_id != actor_id && !actor_is_admin {
            return Err(AppError::Forbidden);
        }

        Topic::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    /// Record activity on a topic (new message posted).
    pub async fn touch_activity(&self, id: i32) -> AppResult<()> {
        let now = chrono::Utc::now().naive_utc();
        Topic::update_many()
            .col_expr(topic::Column::LastActivityDate, Expr::value(now))
            .filter(topic::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn attach_refs(&self, topics: Vec<TopicModel>) -> AppResult<Vec<TopicDetail>> {
        let author_ids: Vec<i32> = topics.iter().map(|t| t.author_id).collect();
        let category_ids: Vec<i32> = topics.iter().map(|t| t.category_id).collect();

        let authors: HashMap<i32, UserModel> = User::find()
            .filter(crate::models::user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let categories: HashMap<i32, CategoryModel> = Category::find()
            .filter(crate::models::category::Column::Id.is_in(category_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(topics
            .into_iter()
            .map(|t| TopicDetail {
                author: authors.get(&t.author_id).cloned(),
                category: categories.get(&t.category_id).cloned(),
                topic: t,
            })
            .collect())
    }
}
