use sea_orm::{ActiveModelTrait, ConnectionTrait, IntoActiveModel, Set};

use crate::common::prelude::*;
use crate::entities::v1::users;
use crate::rbac::Actor;
use crate::requests::v1::user::UserUpdateGeneralInformationRequest;
use crate::responses::v1::user::UserWithRole;

/// Change name, username, email or phone of another user.
///
/// Role and status have their own endpoints.
#[::tracing::instrument(skip(db, request), fields(user_id = id))]
pub async fn update(
    db: &DatabaseConnection,
    actor: &Actor,
    id: i32,
    request: UserUpdateGeneralInformationRequest,
) -> Result<UserWithRole, Error> {
    let user = super::find(db, id).await?;
    super::guard_super_admin(actor, user.role_id)?;

    let user = apply(db, user, request).await?;
    let role = user.role(db).await?;

    ::tracing::info!("User updated");

    Ok(UserWithRole {
        user: user.into(),
        role: role.map(Into::into),
    })
}

pub(crate) async fn apply(
    db: &impl ConnectionTrait,
    user: users::Model,
    request: UserUpdateGeneralInformationRequest,
) -> Result<users::Model, Error> {
    request.validate()?;

    let username = request.username.trim();
    let email = request.email.trim().to_lowercase();

    let mut validation = Validation::new();
    if users::Model::username_taken(db, username, Some(user.id)).await? {
        validation.add("username", "Username already exists");
    }
    if users::Model::email_taken(db, &email, Some(user.id)).await? {
        validation.add("email", "Email already exists");
    }
    validation.into_result()?;

    let mut model = user.into_active_model();
    model.name = Set(request.name.trim().to_string());
    model.username = Set(username.to_string());
    model.email = Set(email);
    model.phone = Set(super::phone(request.phone.as_deref()));
    model.updated_at = Set(now());

    Ok(model.update(db).await?)
}
