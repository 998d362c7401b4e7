use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use rand::rngs::OsRng;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use crate::m20250908_000001_v1_create_modules::Module;
use crate::m20250908_000002_v1_create_submodules::Submodule;
use crate::m20250908_000003_v1_create_permissions::Permission;
use crate::m20250908_000004_v1_create_roles::Role;
use crate::m20250908_000005_v1_create_permission_role::PermissionRole;
use crate::m20250908_000006_v1_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

const MODULES: [(&str, &[&str]); 5] = [
    ("Properties Management", &["Properties", "Property Types"]),
    ("Blog Management", &["Blogs", "Categories", "Comments"]),
    ("Services Management", &["Services List"]),
    ("Testimonial Management", &["Testimonies"]),
    ("User Management", &["Users", "User Roles"]),
];
const ACTIONS: [&str; 4] = ["create", "read", "update", "delete"];

// The first role inserted receives id 1, which the application treats as the super admin.
const SUPER_ADMIN: &str = "Super Admin";
const ROLES: [(&str, &[&str]); 2] = [
    (
        "Property Manager",
        &["Properties Management", "Services Management"],
    ),
    (
        "Content Editor",
        &["Blog Management", "Testimonial Management"],
    ),
];

const ADMIN_USERNAME: &str = "admin";

async fn insert_returning_id(
    manager: &SchemaManager<'_>,
    statement: InsertStatement,
) -> Result<i32, DbErr> {
    let backend = manager.get_database_backend();
    let row = manager
        .get_connection()
        .query_one(backend.build(&statement))
        .await?
        .ok_or(DbErr::RecordNotInserted)?;

    row.try_get("", "id")
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let super_admin = insert_returning_id(
            manager,
            Query::insert()
                .into_table(Role::Table)
                .columns([Role::Name])
                .values_panic([SUPER_ADMIN.into()])
                .returning_col(Role::Id)
                .to_owned(),
        )
        .await?;

        // (module name, permission id) for every seeded permission
        let mut permissions: Vec<(&str, i32)> = vec![];

        for (module, submodules) in MODULES {
            let module_id = insert_returning_id(
                manager,
                Query::insert()
                    .into_table(Module::Table)
                    .columns([Module::Name, Module::IsActive])
                    .values_panic([module.into(), true.into()])
                    .returning_col(Module::Id)
                    .to_owned(),
            )
            .await?;

            for &title in submodules {
                let submodule_id = insert_returning_id(
                    manager,
                    Query::insert()
                        .into_table(Submodule::Table)
                        .columns([Submodule::ModuleId, Submodule::Title, Submodule::IsActive])
                        .values_panic([module_id.into(), title.into(), true.into()])
                        .returning_col(Submodule::Id)
                        .to_owned(),
                )
                .await?;

                for action in ACTIONS {
                    let permission_id = insert_returning_id(
                        manager,
                        Query::insert()
                            .into_table(Permission::Table)
                            .columns([
                                Permission::ModuleId,
                                Permission::SubmoduleId,
                                Permission::Action,
                            ])
                            .values_panic([
                                module_id.into(),
                                submodule_id.into(),
                                action.into(),
                            ])
                            .returning_col(Permission::Id)
                            .to_owned(),
                    )
                    .await?;

                    permissions.push((module, permission_id));
                }
            }
        }

        let mut permission_role = Query::insert()
            .into_table(PermissionRole::Table)
            .columns([PermissionRole::PermissionId, PermissionRole::RoleId])
            .to_owned();

        for &(_, permission) in &permissions {
            permission_role = permission_role
                .values_panic([permission.into(), super_admin.into()])
                .to_owned();
        }

        for (role, modules) in ROLES {
            let role_id = insert_returning_id(
                manager,
                Query::insert()
                    .into_table(Role::Table)
                    .columns([Role::Name])
                    .values_panic([role.into()])
                    .returning_col(Role::Id)
                    .to_owned(),
            )
            .await?;

            for &(module, permission) in &permissions {
                if modules.contains(&module) {
                    permission_role = permission_role
                        .values_panic([permission.into(), role_id.into()])
                        .to_owned();
                }
            }
        }

        manager.exec_stmt(permission_role).await?;

        let salt = SaltString::generate(&mut OsRng);
        let password = Argon2::default()
            .hash_password(b"password", &salt)
            .map_err(|e| DbErr::Custom(format!("Failed to hash seed password: {}", e)))?
            .to_string();

        manager
            .exec_stmt(
                Query::insert()
                    .into_table(User::Table)
                    .columns([
                        User::Name,
                        User::Username,
                        User::Email,
                        User::Password,
                        User::RoleId,
                        User::IsActive,
                    ])
                    .values_panic([
                        "Super Administrator".into(),
                        ADMIN_USERNAME.into(),
                        "admin@realestate.local".into(),
                        password.into(),
                        super_admin.into(),
                        true.into(),
                    ])
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(User::Table)
                    .and_where(Expr::col(User::Username).eq(ADMIN_USERNAME))
                    .to_owned(),
            )
            .await?;

        manager
            .exec_stmt(Query::delete().from_table(PermissionRole::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Permission::Table).to_owned())
            .await?;

        let modules: Vec<&str> = MODULES.iter().map(|(name, _)| *name).collect();

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Submodule::Table)
                    .and_where(
                        Expr::col(Submodule::ModuleId).in_subquery(
                            Query::select()
                                .column(Module::Id)
                                .from(Module::Table)
                                .and_where(Expr::col(Module::Name).is_in(modules.clone()))
                                .to_owned(),
                        ),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Module::Table)
                    .and_where(Expr::col(Module::Name).is_in(modules))
                    .to_owned(),
            )
            .await?;

        let mut roles = vec![SUPER_ADMIN];
        roles.extend(ROLES.iter().map(|(name, _)| *name));

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Role::Table)
                    .and_where(Expr::col(Role::Name).is_in(roles))
                    .to_owned(),
            )
            .await
    }
}
