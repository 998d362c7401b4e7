use sea_orm_migration::prelude::*;

use crate::m20250908_000003_v1_create_permissions::Permission;
use crate::m20250908_000004_v1_create_roles::Role;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PermissionRole::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PermissionRole::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PermissionRole::PermissionId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PermissionRole::RoleId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(PermissionRole::Table, PermissionRole::PermissionId)
                            .to(Permission::Table, Permission::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PermissionRole::Table, PermissionRole::RoleId)
                            .to(Role::Table, Role::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .take(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(PermissionRole::Table)
                    .name("idx_permission_role_permission_id_role_id")
                    .col(PermissionRole::PermissionId)
                    .col(PermissionRole::RoleId)
                    .unique()
                    .take(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(PermissionRole::Table)
                    .name("idx_permission_role_role_id")
                    .col(PermissionRole::RoleId)
                    .take(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(PermissionRole::Table)
                    .take(),
            )
            .await
    }
}

#[derive(DeriveIden)]
pub enum PermissionRole {
    #[sea_orm(iden = "permission_role")]
    Table,
    Id,
    PermissionId,
    RoleId,
}
