use sea_orm_migration::prelude::*;

use crate::m20250908_000001_v1_create_modules::Module;
use crate::m20250908_000002_v1_create_submodules::Submodule;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Permission::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Permission::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Permission::ModuleId).integer().not_null())
                    .col(ColumnDef::new(Permission::SubmoduleId).integer().not_null())
                    .col(ColumnDef::new(Permission::Action).string_len(16).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Permission::Table, Permission::ModuleId)
                            .to(Module::Table, Module::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Permission::Table, Permission::SubmoduleId)
                            .to(Submodule::Table, Submodule::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .take(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Permission::Table)
                    .name("idx_permissions_module_submodule_action")
                    .col(Permission::ModuleId)
                    .col(Permission::SubmoduleId)
                    .col(Permission::Action)
                    .unique()
                    .take(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Permission::Table)
                    .name("idx_permissions_submodule_id")
                    .col(Permission::SubmoduleId)
                    .take(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Permission::Table).take())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Permission {
    #[sea_orm(iden = "permissions")]
    Table,
    Id,
    ModuleId,
    SubmoduleId,
    Action,
}
