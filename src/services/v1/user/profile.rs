use crate::common::prelude::*;
use crate::middlewares::v1::auth::Auth;
use crate::requests::v1::user::UserUpdateGeneralInformationRequest;
use crate::responses::v1::user::UserWithRole;

pub fn show(auth: Auth) -> UserWithRole {
    UserWithRole {
        user: auth.user.into(),
        role: Some(auth.role.into()),
    }
}

/// Same rules as the admin edit, applied to the signed-in user.
#[::tracing::instrument(skip_all, fields(user_id = auth.user.id))]
pub async fn update(
    db: &DatabaseConnection,
    auth: Auth,
    request: UserUpdateGeneralInformationRequest,
) -> Result<UserWithRole, Error> {
    let user = super::update_general_information::apply(db, auth.user, request).await?;

    ::tracing::info!("Profile updated");

    Ok(UserWithRole {
        user: user.into(),
        role: Some(auth.role.into()),
    })
}
