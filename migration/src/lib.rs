pub use sea_orm_migration::prelude::*;

mod m20250908_000001_v1_create_modules;
mod m20250908_000002_v1_create_submodules;
mod m20250908_000003_v1_create_permissions;
mod m20250908_000004_v1_create_roles;
mod m20250908_000005_v1_create_permission_role;
mod m20250908_000006_v1_create_users;
mod m20250908_000007_v1_create_tokens;
mod m20250930_000001_v1_seed_matrix;
mod m20251014_000001_v1_create_password_resets;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250908_000001_v1_create_modules::Migration),
            Box::new(m20250908_000002_v1_create_submodules::Migration),
            Box::new(m20250908_000003_v1_create_permissions::Migration),
            Box::new(m20250908_000004_v1_create_roles::Migration),
            Box::new(m20250908_000005_v1_create_permission_role::Migration),
            Box::new(m20250908_000006_v1_create_users::Migration),
            Box::new(m20250908_000007_v1_create_tokens::Migration),
            Box::new(m20250930_000001_v1_seed_matrix::Migration),
            Box::new(m20251014_000001_v1_create_password_resets::Migration),
        ]
    }
}
