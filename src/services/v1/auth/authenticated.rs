use crate::common::prelude::*;
use crate::middlewares::v1::auth::Auth;
use crate::rbac::PermissionMatrix;
use crate::responses::v1::auth::Authenticated;

#[::tracing::instrument(skip_all, fields(user_id = auth.user.id))]
pub async fn authenticated(matrix: &PermissionMatrix, auth: Auth) -> Result<Authenticated, Error> {
    let permissions = matrix.effective_permissions(&auth.actor()).await?;

    Ok(Authenticated {
        user: auth.user.into(),
        role: auth.role.into(),
        permissions,
    })
}
