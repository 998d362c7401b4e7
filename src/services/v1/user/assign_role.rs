use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};

use crate::common::prelude::*;
use crate::entities::v1::roles;
use crate::rbac::Actor;
use crate::requests::v1::user::UserRoleRequest;
use crate::responses::v1::user::UserWithRole;

/// Move a user to another role. Takes effect on the user's next request.
#[::tracing::instrument(skip(db), fields(user_id = id))]
pub async fn assign_role(
    db: &DatabaseConnection,
    actor: &Actor,
    id: i32,
    request: UserRoleRequest,
) -> Result<UserWithRole, Error> {
    let user = super::find(db, id).await?;
    super::guard_super_admin(actor, user.role_id)?;

    let role = roles::Model::find_by_id(db, request.role_id)
        .await?
        .ok_or_else(|| Error::invalid("role_id", "Role does not exist"))?;
    super::guard_super_admin(actor, role.id)?;

    if actor.user_id == user.id && role.id != user.role_id {
        return Err(Error::invalid("role_id", "You cannot change your own role"));
    }

    let mut user = user.into_active_model();
    user.role_id = Set(role.id);
    user.updated_at = Set(now());
    let user = user.update(db).await?;

    ::tracing::info!(role_id = role.id, "Role assigned");

    Ok(UserWithRole {
        user: user.into(),
        role: Some(role.into()),
    })
}
