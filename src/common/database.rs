use std::time::Duration;

use estate_admin_migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};

use crate::config::DatabaseConfig;

/// Connect using the configured url and pool sizes.
#[::tracing::instrument(skip(config), fields(max_connections = config.max_connections))]
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .idle_timeout(Duration::from_secs(config.idle_timeout))
        .sqlx_logging(config.sqlx_logging);

    let db = Database::connect(options).await?;

    if config.run_migrations {
        migrate(&db).await?;
    }

    ::tracing::info!(backend = ?db.get_database_backend(), "Database connected");

    Ok(db)
}

/// Fresh in-memory SQLite database.
///
/// An in-memory database lives only as long as its connection, so the pool is
/// pinned to a single one.
pub async fn memory() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(Duration::from_secs(24 * 60 * 60))
        .sqlx_logging(false);

    Database::connect(options).await
}

pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db, None).await?;
    ::tracing::info!("Migrations applied");

    Ok(())
}
