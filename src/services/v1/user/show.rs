use crate::common::prelude::*;
use crate::rbac::Actor;
use crate::responses::v1::user::UserWithRole;

#[::tracing::instrument(skip(db), fields(user_id = id))]
pub async fn show(db: &DatabaseConnection, actor: &Actor, id: i32) -> Result<UserWithRole, Error> {
    let user = super::find(db, id).await?;
    if super::guard_super_admin(actor, user.role_id).is_err() {
        return Err(Error::not_found("User not found"));
    }

    let role = user.role(db).await?;

    Ok(UserWithRole {
        user: user.into(),
        role: role.map(Into::into),
    })
}
