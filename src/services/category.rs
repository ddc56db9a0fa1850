use crate::{
    error::{AppError, AppResult},
    models::{category, Category, CategoryModel},
};
use sea_orm::{
    sea_query::{Expr, Func},
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, SqlErr,
};

pub struct CategoryService {
    db: DatabaseConnection,
}

impl CategoryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<CategoryModel>> {
        let categories = Category::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;
        Ok(categories)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<CategoryModel> {
        Category::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn create(&self, name: &str, description: Option<String>) -> AppResult<CategoryModel> {
        // Case-insensitive uniqueness is checked here; the DB unique index on
        // name only catches exact duplicates.
        if self.name_taken(name, None).await? {
            return Err(AppError::Conflict(
                "A category with this name already exists".to_string(),
            ));
        }

        let new_category = category::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description),
            row_version: Set(0),
            ..Default::default()
        };

        match new_category.insert(&self.db).await {
            Ok(created) => Ok(created),
            // Lost the race against a concurrent insert of the same name.
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AppError::Conflict(
                    "A category with this name already exists".to_string(),
                ))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn update(
        &self,
        id: i32,
        payload_id: i32,
        name: &str,
        description: Option<String>,
    ) -> AppResult<CategoryModel> {
        // Path and payload identifiers must agree exactly.
        if id != payload_id {
            return Err(AppError::NotFound);
        }

        let existing = self.get_by_id(id).await?;

        if self.name_taken(name, Some(id)).await? {
            return Err(AppError::Conflict(
                "A category with this name already exists".to_string(),
            ));
        }

        let active = category::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description),
            row_version: Set(existing.row_version + 1),
            ..Default::default()
        };

        let result = Category::update_many()
            .set(active)
            .filter(category::Column::Id.eq(id))
            .filter(category::Column::RowVersion.eq(existing.row_version))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            // Stale write: the row is either gone or was changed under us.
            return match Category::find_by_id(id).one(&self.db).await? {
                None => Err(AppError::NotFound),
                Some(_) => Err(AppError::ConcurrencyConflict),
            };
        }

        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let Some(_existing) = Category::find_by_id(id).one(&self.db).await? else {
            // Already gone, nothing to do.
            return Ok(());
        };

        match Category::delete_by_id(id).exec(&self.db).await {
            Ok(_) => Ok(()),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) => {
                // Distinguish "already gone" from "exists but undeletable".
                match Category::find_by_id(id).one(&self.db).await? {
                    None => Ok(()),
                    Some(_) => Err(AppError::DeleteRestricted(
                        "Category has topics and cannot be deleted".to_string(),
                    )),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn name_taken(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let mut query = Category::find().filter(
            Expr::expr(Func::lower(Expr::col(category::Column::Name))).eq(name.to_lowercase()),
        );

        if let Some(id) = exclude_id {
            query = query.filter(category::Column::Id.ne(id));
        }

        Ok(query.one(&self.db).await?.is_some())
    }
}
