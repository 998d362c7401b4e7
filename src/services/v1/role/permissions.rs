use crate::common::prelude::*;
use crate::rbac::{Actor, PermissionMatrix};
use crate::requests::v1::role::RolePermissionsRequest;
use crate::responses::v1::role::{Permission, RolePermissions};

/// Replace the role's grants with the submitted set.
#[::tracing::instrument(skip(matrix, request), fields(role_id = id))]
pub async fn update_permissions(
    matrix: &PermissionMatrix,
    actor: &Actor,
    id: i32,
    request: RolePermissionsRequest,
) -> Result<RolePermissions, Error> {
    super::guard_super_admin_role(actor, id)?;

    let grants = request.into_grants()?;
    let attached = matrix.replace_role_permissions(id, grants).await?;

    Ok(RolePermissions {
        role_id: id,
        permissions: attached.into_iter().map(Permission::from).collect(),
    })
}
