use sea_orm::{EntityTrait, TransactionTrait};

use crate::common::prelude::*;
use crate::entities::v1::{tokens, users};
use crate::rbac::Actor;

#[::tracing::instrument(skip(db), fields(user_id = id))]
pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: i32) -> Result<Success, Error> {
    let user = super::find(db, id).await?;
    super::guard_super_admin(actor, user.role_id)?;
    super::guard_self(actor, &user, "You cannot delete your own account")?;

    let txn = db.begin().await?;
    tokens::Model::revoke_all(&txn, user.id).await?;
    users::Entity::delete_by_id(user.id).exec(&txn).await?;
    txn.commit().await?;

    ::tracing::info!("User deleted");

    Ok(Success::new("User deleted"))
}
