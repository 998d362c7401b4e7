use std::collections::{BTreeSet, HashMap};

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use crate::common::prelude::*;
use crate::entities::v1::{permission_role, roles, users};
use crate::rbac::{Actor, SUPER_ADMIN_ROLE_ID};
use crate::responses::v1::role::RoleSummary;

#[derive(Default)]
struct Counts {
    permissions: u64,
    modules: BTreeSet<i32>,
    submodules: BTreeSet<i32>,
}

/// Every role with usage counts. The super admin role is hidden from others.
#[::tracing::instrument(skip(db), fields(role_id = actor.role_id))]
pub async fn index(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<RoleSummary>, Error> {
    let mut query = roles::Entity::find().order_by_asc(roles::Column::Id);
    if !actor.is_super_admin() {
        query = query.filter(roles::Column::Id.ne(SUPER_ADMIN_ROLE_ID));
    }
    let roles = query.all(db).await?;

    let users: HashMap<i32, i64> = users::Entity::find()
        .select_only()
        .column(users::Column::RoleId)
        .column_as(Expr::col(users::Column::Id).count(), "users_count")
        .group_by(users::Column::RoleId)
        .into_tuple::<(i32, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let grants: Vec<(i32, i32, i32)> = permission_role::Entity::find()
        .select_only()
        .column(permission_role::Column::RoleId)
        .column(crate::entities::v1::permissions::Column::ModuleId)
        .column(crate::entities::v1::permissions::Column::SubmoduleId)
        .join(JoinType::InnerJoin, permission_role::Relation::Permissions.def())
        .into_tuple()
        .all(db)
        .await?;

    let mut counts: HashMap<i32, Counts> = HashMap::new();
    for (role_id, module_id, submodule_id) in grants {
        let entry = counts.entry(role_id).or_default();
        entry.permissions += 1;
        entry.modules.insert(module_id);
        entry.submodules.insert(submodule_id);
    }

    Ok(roles
        .into_iter()
        .map(|role| {
            let counts = counts.remove(&role.id).unwrap_or_default();

            RoleSummary {
                users_count: users.get(&role.id).copied().unwrap_or(0).max(0) as u64,
                permissions_count: counts.permissions,
                modules_count: counts.modules.len() as u64,
                submodules_count: counts.submodules.len() as u64,
                id: role.id,
                name: role.name,
            }
        })
        .collect())
}
