use sea_orm_migration::prelude::*;

use crate::m20250908_000006_v1_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PasswordReset::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PasswordReset::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PasswordReset::UserId).integer().not_null())
                    .col(ColumnDef::new(PasswordReset::ExpiredAt).date_time().not_null())
                    .col(ColumnDef::new(PasswordReset::CreatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(PasswordReset::Table, PasswordReset::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .take(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(PasswordReset::Table)
                    .col(PasswordReset::UserId)
                    .name("idx_password_reset_user_id")
                    .take(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(PasswordReset::Table)
                    .take(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum PasswordReset {
    #[sea_orm(iden = "password_resets")]
    Table,
    Id,
    UserId,
    ExpiredAt,
    CreatedAt,
}
