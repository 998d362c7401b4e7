use sea_orm::{ActiveModelTrait, Set};

use crate::common::prelude::*;
use crate::entities::v1::{roles, users};
use crate::rbac::Actor;
use crate::requests::v1::user::UserStoreRequest;
use crate::responses::v1::user::UserWithRole;
use crate::security::PasswordHasher;

#[::tracing::instrument(skip(db, hasher, request), fields(username = %request.username))]
pub async fn store(
    db: &DatabaseConnection,
    hasher: &PasswordHasher,
    actor: &Actor,
    request: UserStoreRequest,
) -> Result<UserWithRole, Error> {
    request.validate()?;

    let role = roles::Model::find_by_id(db, request.role_id)
        .await?
        .ok_or_else(|| Error::invalid("role_id", "Role does not exist"))?;
    super::guard_super_admin(actor, role.id)?;

    let username = request.username.trim();
    let email = request.email.trim().to_lowercase();

    let mut validation = Validation::new();
    if users::Model::username_taken(db, username, None).await? {
        validation.add("username", "Username already exists");
    }
    if users::Model::email_taken(db, &email, None).await? {
        validation.add("email", "Email already exists");
    }
    validation.into_result()?;

    let password = hasher.hash(&request.password).map_err(Error::internal)?;
    let phone = super::phone(request.phone.as_deref());

    let now = now();
    let user = users::ActiveModel {
        name: Set(request.name.trim().to_string()),
        username: Set(username.to_string()),
        email: Set(email),
        phone: Set(phone),
        password: Set(password),
        role_id: Set(role.id),
        is_active: Set(true),
        last_login_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    ::tracing::info!(user_id = user.id, role_id = role.id, "User created");

    Ok(UserWithRole {
        user: user.into(),
        role: Some(role.into()),
    })
}
