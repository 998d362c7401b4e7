use crate::common::prelude::*;
use crate::entities::v1::tokens;
use crate::middlewares::v1::auth::Auth;

/// Revoke every session of the current user.
#[::tracing::instrument(skip_all, fields(user_id = auth.user.id))]
pub async fn logout(db: &DatabaseConnection, auth: &Auth) -> Result<Success, Error> {
    let revoked = tokens::Model::revoke_all(db, auth.user.id).await?;

    ::tracing::info!(revoked, "Logged out");

    Ok(Success::new("Logged out"))
}
