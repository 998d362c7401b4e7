use chrono::{Duration, NaiveDateTime};
use sea_orm::prelude::*;
use sea_orm::{ActiveModelTrait, Set};

use crate::common::now;
use crate::entities::v1::password_resets::{ActiveModel, Column, Entity, Model};
use crate::entities::v1::users;

impl Model {
    /// Replace any pending reset of `user_id` with a new one valid for `lifetime`.
    pub async fn issue(
        db: &impl ConnectionTrait,
        user_id: i32,
        lifetime: Duration,
    ) -> Result<Self, DbErr> {
        Self::revoke_all(db, user_id).await?;

        let now = now();
        ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            expired_at: Set(now + lifetime),
            created_at: Set(now),
        }
        .insert(db)
        .await
    }

    pub async fn find_with_user(
        db: &impl ConnectionTrait,
        id: Uuid,
    ) -> Result<Option<(Self, users::Model)>, DbErr> {
        let found = Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(db)
            .await?;

        Ok(found.and_then(|(reset, user)| user.map(|user| (reset, user))))
    }

    pub async fn revoke_all(db: &impl ConnectionTrait, user_id: i32) -> Result<u64, DbErr> {
        Ok(Entity::delete_many()
            .filter(Column::UserId.eq(user_id))
            .exec(db)
            .await?
            .rows_affected)
    }

    pub fn is_expired(&self, at: NaiveDateTime) -> bool {
        self.expired_at <= at
    }

    /// Value handed to the user and sent back with the new password
    pub fn token(&self) -> String {
        self.id.simple().to_string()
    }
}
