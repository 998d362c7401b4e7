use sea_orm::{ActiveModelTrait, IntoActiveModel, Set, TransactionTrait};

use crate::common::prelude::*;
use crate::entities::v1::{password_resets, tokens};
use crate::middlewares::v1::auth::Auth;
use crate::requests::v1::user::UserUpdatePasswordRequest;
use crate::security::PasswordHasher;

/// Change the signed-in user's password.
///
/// Every other session of the user is revoked together with pending
/// reset tokens. The token used for this request stays valid.
#[::tracing::instrument(skip_all, fields(user_id = auth.user.id))]
pub async fn update(
    db: &DatabaseConnection,
    hasher: &PasswordHasher,
    auth: &Auth,
    request: UserUpdatePasswordRequest,
) -> Result<Success, Error> {
    request.validate()?;

    if !hasher
        .verify(&request.current_password, &auth.user.password)
        .map_err(Error::internal)?
    {
        return Err(Error::invalid(
            "current_password",
            "Current password is incorrect",
        ));
    }

    let password = hasher.hash(&request.new_password).map_err(Error::internal)?;

    let txn = db.begin().await?;
    let mut model = auth.user.clone().into_active_model();
    model.password = Set(password);
    model.updated_at = Set(now());
    model.update(&txn).await?;

    let revoked = tokens::Model::revoke_others(&txn, auth.user.id, auth.token.id).await?;
    password_resets::Model::revoke_all(&txn, auth.user.id).await?;
    txn.commit().await?;

    ::tracing::info!(revoked, "Password changed");

    Ok(Success::new("Password updated"))
}
