use sea_orm::{ActiveModelTrait, Set};

use crate::common::prelude::*;
use crate::entities::v1::roles::{ActiveModel, Model};
use crate::requests::v1::role::RoleRequest;
use crate::responses::v1::role::Role;

#[::tracing::instrument(skip(db, request), fields(name = %request.name))]
pub async fn store(db: &DatabaseConnection, request: RoleRequest) -> Result<Role, Error> {
    request.validate()?;

    let name = request.name.trim();
    if Model::name_taken(db, name, None).await? {
        return Err(Error::invalid("name", "Name already exists"));
    }

    let now = now();
    let role = ActiveModel {
        name: Set(name.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    ::tracing::info!(role_id = role.id, "Role created");

    Ok(role.into())
}
