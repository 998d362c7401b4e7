use sea_orm::TransactionTrait;

use crate::common::prelude::*;
use crate::config::AuthConfig;
use crate::entities::v1::password_resets;
use crate::rbac::Actor;
use crate::responses::v1::user::PasswordResetIssued;

/// Issue a one-time reset token for another user.
///
/// The token is returned to the caller, who hands it over out of band.
/// A previously issued token of the same user stops working.
#[::tracing::instrument(skip(db, config), fields(user_id = id))]
pub async fn issue(
    db: &DatabaseConnection,
    config: &AuthConfig,
    actor: &Actor,
    id: i32,
) -> Result<PasswordResetIssued, Error> {
    let user = super::find(db, id).await?;
    super::guard_super_admin(actor, user.role_id)?;

    if !user.is_active {
        return Err(Error::forbidden("User account is inactive"));
    }

    let txn = db.begin().await?;
    let reset =
        password_resets::Model::issue(&txn, user.id, config.password_reset_lifetime()).await?;
    txn.commit().await?;

    ::tracing::info!("Password reset issued");

    Ok(PasswordResetIssued {
        token: reset.token(),
        expired_at: reset.expired_at,
    })
}
