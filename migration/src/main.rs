use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(estate_admin_migration::Migrator).await;
}
