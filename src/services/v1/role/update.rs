use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};

use crate::common::prelude::*;
use crate::entities::v1::roles::Model;
use crate::rbac::Actor;
use crate::requests::v1::role::RoleRequest;
use crate::responses::v1::role::Role;

#[::tracing::instrument(skip(db, request), fields(role_id = id, name = %request.name))]
pub async fn update(
    db: &DatabaseConnection,
    actor: &Actor,
    id: i32,
    request: RoleRequest,
) -> Result<Role, Error> {
    super::guard_super_admin_role(actor, id)?;
    request.validate()?;

    let role = Model::find_by_id(db, id)
        .await?
        .ok_or_else(|| Error::not_found("Role not found"))?;

    let name = request.name.trim();
    if Model::name_taken(db, name, Some(id)).await? {
        return Err(Error::invalid("name", "Name already exists"));
    }

    let mut role = role.into_active_model();
    role.name = Set(name.to_string());
    role.updated_at = Set(now());
    let role = role.update(db).await?;

    ::tracing::info!("Role updated");

    Ok(role.into())
}
