use chrono::{Duration, NaiveDateTime};
use sea_orm::prelude::*;
use sea_orm::{ActiveModelTrait, Set};

use crate::common::now;
use crate::entities::v1::tokens::{ActiveModel, Column, Entity, Model};
use crate::entities::v1::users;

impl Model {
    /// Persist a new token for `user_id` valid for `lifetime`.
    pub async fn issue(
        db: &impl ConnectionTrait,
        user_id: i32,
        lifetime: Duration,
    ) -> Result<Self, DbErr> {
        ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            expired_at: Set(Some(now() + lifetime)),
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

        Ok(found.and_then(|(token, user)| user.map(|user| (token, user))))
    }

    /// Delete every token of the user. Returns how many were removed.
    pub async fn revoke_all(db: &impl ConnectionTrait, user_id: i32) -> Result<u64, DbErr> {
        Ok(Entity::delete_many()
            .filter(Column::UserId.eq(user_id))
            .exec(db)
            .await?
            .rows_affected)
    }

    /// Delete every token of the user except `keep`.
    pub async fn revoke_others(
        db: &impl ConnectionTrait,
        user_id: i32,
        keep: Uuid,
    ) -> Result<u64, DbErr> {
        Ok(Entity::delete_many()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Id.ne(keep))
            .exec(db)
            .await?
            .rows_affected)
    }

    pub fn is_expired(&self, at: NaiveDateTime) -> bool {
        self.expired_at.is_some_and(|expired_at| expired_at <= at)
    }

    /// Value clients send as `Authorization: Bearer <token>`
    pub fn bearer(&self) -> String {
        self.id.simple().to_string()
    }
}
