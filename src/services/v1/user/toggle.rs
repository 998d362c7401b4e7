use sea_orm::{ActiveModelTrait, IntoActiveModel, Set, TransactionTrait};

use crate::common::prelude::*;
use crate::entities::v1::tokens;
use crate::rbac::Actor;
use crate::responses::v1::user::User;

/// Flip `is_active`. Deactivation revokes every token of the user.
#[::tracing::instrument(skip(db), fields(user_id = id))]
pub async fn toggle(db: &DatabaseConnection, actor: &Actor, id: i32) -> Result<User, Error> {
    let user = super::find(db, id).await?;
    super::guard_super_admin(actor, user.role_id)?;
    super::guard_self(actor, &user, "You cannot deactivate your own account")?;

    let active = !user.is_active;

    let txn = db.begin().await?;
    let mut model = user.into_active_model();
    model.is_active = Set(active);
    model.updated_at = Set(now());
    let user = model.update(&txn).await?;

    let revoked = if active {
        0
    } else {
        tokens::Model::revoke_all(&txn, user.id).await?
    };
    txn.commit().await?;

    ::tracing::info!(active, revoked, "User status toggled");

    Ok(user.into())
}
