use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, SqlErr, TransactionTrait};

use crate::common::prelude::*;
use crate::entities::v1::{permission_role, roles};
use crate::rbac::{Actor, SUPER_ADMIN_ROLE_ID};

fn still_assigned(users: u64) -> Error {
    Error::invalid("role", format!("Role is still assigned to {users} user(s)"))
}

/// Delete a role and its grants. Refused while users still hold it.
///
/// The role row is written first so the user count and the delete see the
/// same state. A user assigned concurrently on a backend that does not queue
/// behind that write trips the foreign key instead, which is reported the
/// same way.
#[::tracing::instrument(skip(db), fields(role_id = id))]
pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: i32) -> Result<Success, Error> {
    if id == SUPER_ADMIN_ROLE_ID {
        return Err(Error::forbidden("The super admin role cannot be deleted"));
    }

    let txn = db.begin().await?;

    if !roles::Model::touch(&txn, id).await? {
        return Err(Error::not_found("Role not found"));
    }

    let users = roles::Model::users_count(&txn, id).await?;
    if users > 0 {
        return Err(still_assigned(users));
    }

    let detached = permission_role::Entity::delete_many()
        .filter(permission_role::Column::RoleId.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;
    let deleted = roles::Entity::delete_by_id(id)
        .exec(&txn)
        .await
        .map_err(|e: DbErr| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                ::tracing::info!("User assigned while deleting");
                Error::invalid("role", "Role is still assigned to users")
            }
            _ => e.into(),
        })?
        .rows_affected;
    if deleted == 0 {
        return Err(Error::not_found("Role not found"));
    }
    txn.commit().await?;

    ::tracing::info!(actor = actor.user_id, detached, "Role deleted");

    Ok(Success::new("Role deleted"))
}
