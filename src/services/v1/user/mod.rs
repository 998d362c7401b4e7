pub mod assign_role;
pub mod delete;
pub mod paginate;
pub mod password_reset;
pub mod profile;
pub mod show;
pub mod store;
pub mod toggle;
pub mod update_general_information;
pub mod update_password;

use crate::common::Error;
use crate::entities::v1::users;
use crate::rbac::{Actor, SUPER_ADMIN_ROLE_ID};

/// Super admin accounts and the super admin role are out of reach for everyone else.
pub(crate) fn guard_super_admin(actor: &Actor, role_id: i32) -> Result<(), Error> {
    if role_id == SUPER_ADMIN_ROLE_ID && !actor.is_super_admin() {
        return Err(Error::forbidden("Only a super admin may manage super admins"));
    }

    Ok(())
}

pub(crate) fn guard_self(actor: &Actor, user: &users::Model, message: &str) -> Result<(), Error> {
    if actor.user_id == user.id {
        return Err(Error::invalid("user", message));
    }

    Ok(())
}

pub(crate) async fn find(
    db: &sea_orm::DatabaseConnection,
    id: i32,
) -> Result<users::Model, Error> {
    users::Model::find_by_id(db, id)
        .await?
        .ok_or_else(|| Error::not_found("User not found"))
}

/// Blank phone numbers are stored as NULL.
pub(crate) fn phone(phone: Option<&str>) -> Option<String> {
    phone
        .map(str::trim)
        .filter(|phone| !phone.is_empty())
        .map(str::to_string)
}
