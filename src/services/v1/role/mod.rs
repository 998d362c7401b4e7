pub mod delete;
pub mod index;
pub mod permissions;
pub mod show;
pub mod store;
pub mod update;

use crate::common::Error;
use crate::rbac::{Actor, SUPER_ADMIN_ROLE_ID};

/// Only the super admin may touch the super admin role.
pub(crate) fn guard_super_admin_role(actor: &Actor, role_id: i32) -> Result<(), Error> {
    if role_id == SUPER_ADMIN_ROLE_ID && !actor.is_super_admin() {
        return Err(Error::forbidden("The super admin role cannot be modified"));
    }

    Ok(())
}
