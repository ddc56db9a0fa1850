use crate::{
    error::{AppError, AppResult},
    models::{article, Article, ArticleModel},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

pub struct ArticleService {
    db: DatabaseConnection,
}

impl ArticleService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, page: u64, per_page: u64) -> AppResult<(Vec<ArticleModel>, u64)> {
        let paginator = Article::find()
            .order_by_desc(article::Column::PublishDate)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let articles = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((articles, total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<ArticleModel> {
        Article::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn create(&self, author_id: i32, title: &str, content: &str) -> AppResult<ArticleModel> {
        let now = chrono::Utc::now().naive_utc();

        let new_article = article::ActiveModel {
            title: Set(title.to_string()),
            content: Set(content.to_string()),
            publish_date: Set(now),
            author_id: Set(author_id),
            row_version: Set(0),
            ..Default::default()
        };

        let article = new_article.insert(&self.db).await?;
        Ok(article)
    }

    pub async fn update(
        &self,
        id: i32,
        payload_id: i32,
        actor_id: i32,
        actor_is_admin: bool,
        title: &str,
        content: &str,
    ) -> AppResult<ArticleModel> {
        if id != payload_id {
            return Err(AppError::NotFound);
        }

        let existing = self.get_by_id(id).await?;
        if existing.author_id != actor_id && !actor_is_admin {
            return Err(AppError::Forbidden);
        }

        let active = article::ActiveModel {
            title: Set(title.to_string()),
            content: Set(content.to_string()),
            row_version: Set(existing.row_version + 1),
            ..Default::default()
        };

        let result = Article::update_many()
            .set(active)
            .filter(article::Column::Id.eq(id))
            .filter(article::Column::RowVersion.eq(existing.row_version))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return match Article::find_by_id(id).one(&self.db).await? {
                None => Err(AppError::NotFound),
                Some(_) => Err(AppError::ConcurrencyConflict),
            };
        }

        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: i32, actor_id: i32, actor_is_admin: bool) -> AppResult<()> {
        let Some(existing) = Article::find_by_id(id).one(&self.db).await? else {
            return Ok(());
        };

        if existing.author_id != actor_id && !actor_is_admin {
            return Err(AppError::Forbidden);
        }

        Article::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
