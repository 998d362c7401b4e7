use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set, TransactionTrait};

use crate::common::prelude::*;
use crate::entities::v1::{password_resets, tokens};
use crate::requests::v1::auth::PasswordResetRequest;
use crate::security::PasswordHasher;

const INVALID: &str = "Reset token is invalid or has expired";

/// Redeem a reset token for a new password.
///
/// The token is single use. On success every session of the user is revoked.
#[::tracing::instrument(skip_all)]
pub async fn reset(
    db: &DatabaseConnection,
    hasher: &PasswordHasher,
    request: PasswordResetRequest,
) -> Result<Success, Error> {
    request.validate()?;

    let id = Uuid::parse_str(request.token.trim()).map_err(|_| Error::bad_request(INVALID))?;
    let (reset, user) = password_resets::Model::find_with_user(db, id)
        .await?
        .ok_or_else(|| Error::bad_request(INVALID))?;

    if reset.is_expired(now()) {
        password_resets::Entity::delete_by_id(reset.id)
            .exec(db)
            .await?;
        ::tracing::info!(user_id = user.id, "Expired reset token refused");
        return Err(Error::bad_request(INVALID));
    }

    if !user.is_active {
        return Err(Error::forbidden("Account is inactive"));
    }

    let password = hasher.hash(&request.password).map_err(Error::internal)?;

    let txn = db.begin().await?;
    // a concurrent redeem of the same token finds nothing left to delete
    let consumed = password_resets::Entity::delete_by_id(reset.id)
        .exec(&txn)
        .await?
        .rows_affected;
    if consumed == 0 {
        return Err(Error::bad_request(INVALID));
    }

    let user_id = user.id;
    let mut model = user.into_active_model();
    model.password = Set(password);
    model.updated_at = Set(now());
    model.update(&txn).await?;

    password_resets::Model::revoke_all(&txn, user_id).await?;
    let revoked = tokens::Model::revoke_all(&txn, user_id).await?;
    txn.commit().await?;

    ::tracing::info!(user_id, revoked, "Password reset");

    Ok(Success::new(
        "Password reset successfully. Please login with your new password.",
    ))
}
