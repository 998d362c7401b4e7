use sea_orm_migration::prelude::*;

use crate::m20250908_000001_v1_create_modules::Module;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Submodule::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submodule::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Submodule::ModuleId).integer().not_null())
                    .col(ColumnDef::new(Submodule::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Submodule::Path).string_len(255).null())
                    .col(
                        ColumnDef::new(Submodule::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Submodule::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Submodule::UpdatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Children are removed explicitly before their module, never by the database.
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submodule::Table, Submodule::ModuleId)
                            .to(Module::Table, Module::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .take(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Submodule::Table)
                    .name("idx_submodules_module_id_title")
                    .col(Submodule::ModuleId)
                    .col(Submodule::Title)
                    .unique()
                    .take(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Submodule::Table).take())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Submodule {
    #[sea_orm(iden = "submodules")]
    Table,
    Id,
    ModuleId,
    Title,
    Path,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
