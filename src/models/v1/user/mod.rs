use sea_orm::prelude::*;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::{Condition, PaginatorTrait};

use crate::entities::v1::roles;
use crate::entities::v1::users::{Column, Entity, Model};

impl Model {
    pub async fn find_by_id(db: &impl ConnectionTrait, id: i32) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Look a user up by email or username.
    pub async fn find_by_identifier(
        db: &impl ConnectionTrait,
        identifier: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(
                Condition::any()
                    .add(Column::Email.eq(identifier))
                    .add(Column::Username.eq(identifier)),
            )
            .one(db)
            .await
    }

    /// Whether a user other than `except` already uses `email`
    pub async fn email_taken(
        db: &impl ConnectionTrait,
        email: &str,
        except: Option<i32>,
    ) -> Result<bool, DbErr> {
        taken(db, Column::Email.eq(email), except).await
    }

    pub async fn username_taken(
        db: &impl ConnectionTrait,
        username: &str,
        except: Option<i32>,
    ) -> Result<bool, DbErr> {
        taken(db, Column::Username.eq(username), except).await
    }

    pub async fn role(&self, db: &impl ConnectionTrait) -> Result<Option<roles::Model>, DbErr> {
        roles::Entity::find_by_id(self.role_id).one(db).await
    }
}

async fn taken(
    db: &impl ConnectionTrait,
    matches: SimpleExpr,
    except: Option<i32>,
) -> Result<bool, DbErr> {
    let mut condition = Condition::all().add(matches);
    if let Some(id) = except {
        condition = condition.add(Column::Id.ne(id));
    }

    Ok(Entity::find().filter(condition).count(db).await? > 0)
}
