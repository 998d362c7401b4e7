use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};

use crate::common::prelude::*;
use crate::entities::v1::permissions::Action;
use crate::entities::v1::{modules, permission_role, permissions, roles, submodules};
use crate::rbac::{Actor, SUPER_ADMIN_ROLE_ID};
use crate::responses::v1::role::{RoleDetail, RoleModule, RoleSubmodule};

#[derive(FromQueryResult)]
struct GrantRow {
    module_id: i32,
    module: String,
    submodule_id: i32,
    submodule: String,
    action: Action,
}

/// Role with its grants as a module → submodule → actions tree.
///
/// Inactive modules and submodules are included; this is the editor's view.
#[::tracing::instrument(skip(db), fields(role_id = id))]
pub async fn show(db: &DatabaseConnection, actor: &Actor, id: i32) -> Result<RoleDetail, Error> {
    if id == SUPER_ADMIN_ROLE_ID && !actor.is_super_admin() {
        return Err(Error::not_found("Role not found"));
    }

    let role = roles::Model::find_by_id(db, id)
        .await?
        .ok_or_else(|| Error::not_found("Role not found"))?;

    let rows = permission_role::Entity::find()
        .select_only()
        .column(permissions::Column::ModuleId)
        .column_as(modules::Column::Name, "module")
        .column(permissions::Column::SubmoduleId)
        .column_as(submodules::Column::Title, "submodule")
        .column(permissions::Column::Action)
        .join(JoinType::InnerJoin, permission_role::Relation::Permissions.def())
        .join(JoinType::InnerJoin, permissions::Relation::Modules.def())
        .join(JoinType::InnerJoin, permissions::Relation::Submodules.def())
        .filter(permission_role::Column::RoleId.eq(id))
        .order_by_asc(permissions::Column::ModuleId)
        .order_by_asc(permissions::Column::SubmoduleId)
        .order_by_asc(permissions::Column::Id)
        .into_model::<GrantRow>()
        .all(db)
        .await?;

    Ok(RoleDetail {
        role: role.into(),
        modules: tree(rows),
    })
}

/// Rows must arrive ordered by module then submodule.
fn tree(rows: Vec<GrantRow>) -> Vec<RoleModule> {
    let mut modules: Vec<RoleModule> = Vec::new();

    for row in rows {
        if modules.last().is_none_or(|module| module.id != row.module_id) {
            modules.push(RoleModule {
                id: row.module_id,
                name: row.module,
                submodules: Vec::new(),
            });
        }
        let Some(module) = modules.last_mut() else {
            continue;
        };

        if module
            .submodules
            .last()
            .is_none_or(|submodule| submodule.id != row.submodule_id)
        {
            module.submodules.push(RoleSubmodule {
                id: row.submodule_id,
                title: row.submodule,
                actions: Vec::new(),
            });
        }
        if let Some(submodule) = module.submodules.last_mut() {
            submodule.actions.push(row.action);
        }
    }

    for module in &mut modules {
        for submodule in &mut module.submodules {
            submodule.actions.sort();
        }
    }

    modules
}
