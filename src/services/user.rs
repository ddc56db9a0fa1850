use crate::{
    error::{AppError, AppResult},
    models::{user, User, UserModel, UserRole},
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, SqlErr,
};

/// Admin-only mutations; `None` leaves the field unchanged.
#[derive(Debug, Default, Clone)]
pub struct AdminChanges {
    pub role: Option<UserRole>,
    pub is_banned: Option<bool>,
    pub points: Option<i32>,
}

pub struct UserService {
    db: DatabaseConnection,
}

impl UserService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, page: u64, per_page: u64) -> AppResult<(Vec<UserModel>, u64)> {
        let paginator = User::find()
            .order_by_asc(user::Column::Id)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((users, total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<UserModel> {
        User::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn update(
        &self,
        id: i32,
        payload_id: i32,
        actor_id: i32,
        actor_is_admin: bool,
        avatar_url: Option<String>,
        bio: Option<String>,
        admin_changes: AdminChanges,
    ) -> AppResult<UserModel> {
        if id != payload_id {
            return Err(AppError::NotFound);
        }

        if id != actor_id && !actor_is_admin {
            return Err(AppError::Forbidden);
        }

        let wants_admin_change = admin_changes.role.is_some()
            || admin_changes.is_banned.is_some()
            || admin_changes.points.is_some();
        if wants_admin_change && !actor_is_admin {
            return Err(AppError::Forbidden);
        }

        let existing = self.get_by_id(id).await?;

        let mut active = user::ActiveModel {
            avatar_url: Set(avatar_url),
            bio: Set(bio),
            row_version: Set(existing.row_version + 1),
            ..Default::default()
        };

        if let Some(role) = admin_changes.role {
            active.role = Set(role);
        }
        if let Some(is_banned) = admin_changes.is_banned {
            active.is_banned = Set(is_banned);
        }
        if let Some(points) = admin_changes.points {
            active.points = Set(points);
        }

        let result = User::update_many()
            .set(active)
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::RowVersion.eq(existing.row_version))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return match User::find_by_id(id).one(&self.db).await? {
                None => Err(AppError::NotFound),
                Some(_) => Err(AppError::ConcurrencyConflict),
            };
        }

        self.get_by_id(id).await
    }

    /// Delete a user. Rejected while the user still has topics, messages or
    /// articles (restrict foreign keys).
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let Some(_existing) = User::find_by_id(id).one(&self.db).await? else {
            return Ok(());
        };

        match User::delete_by_id(id).exec(&self.db).await {
            Ok(_) => Ok(()),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) => {
                match User::find_by_id(id).one(&self.db).await? {
                    None => Ok(()),
                    Some(_) => Err(AppError::DeleteRestricted(
                        "User has topics, messages or articles and cannot be deleted".to_string(),
                    )),
                }
            }
            Err(err) => Err(err.into()),
        }
    }
}
