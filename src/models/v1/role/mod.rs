use sea_orm::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{Condition, PaginatorTrait};

use crate::common::now;
use crate::entities::v1::roles::{Column, Entity, Model};
use crate::entities::v1::users;

impl Model {
    pub async fn find_by_id(db: &impl ConnectionTrait, id: i32) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Stamp `updated_at`, locking the row for the rest of the transaction.
    /// `false` when the role does not exist.
    pub async fn touch(db: &impl ConnectionTrait, id: i32) -> Result<bool, DbErr> {
        let touched = Entity::update_many()
            .col_expr(Column::UpdatedAt, Expr::value(now()))
            .filter(Column::Id.eq(id))
            .exec(db)
            .await?
            .rows_affected;

        Ok(touched > 0)
    }

    /// Whether another role already uses `name`
    pub async fn name_taken(
        db: &impl ConnectionTrait,
        name: &str,
        except: Option<i32>,
    ) -> Result<bool, DbErr> {
        let mut condition = Condition::all().add(Column::Name.eq(name));
        if let Some(id) = except {
            condition = condition.add(Column::Id.ne(id));
        }

        Ok(Entity::find().filter(condition).count(db).await? > 0)
    }

    pub async fn users_count(db: &impl ConnectionTrait, role_id: i32) -> Result<u64, DbErr> {
        users::Entity::find()
            .filter(users::Column::RoleId.eq(role_id))
            .count(db)
            .await
    }
}
