use rand::Rng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::common::{database, now};
use crate::config::{Argon2Config, AuthConfig};
use crate::entities::v1::permissions::Action;
use crate::entities::v1::{modules, roles, submodules, users};
use crate::rbac::{Grant, PermissionMatrix};
use crate::security::PasswordHasher;

pub use sea_orm::DatabaseConnection;

/// Password of every user created here and of the seeded `admin`.
pub const PASSWORD: &str = "password";

/// In-memory SQLite with every migration applied, seed data included.
///
/// Each call returns an isolated database.
pub async fn database() -> DatabaseConnection {
    let db = database::memory()
        .await
        .expect("Failed to connect to in-memory database");

    database::migrate(&db).await.expect("Failed to run migrations");

    db
}

/// Cheap Argon2 parameters so tests do not spend their time hashing.
pub fn auth_config() -> AuthConfig {
    AuthConfig {
        token_expiration: 3600,
        password_reset_expiration: 900,
        argon2: Argon2Config {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
            hash_length: 32,
        },
    }
}

pub fn password_hasher() -> PasswordHasher {
    PasswordHasher::from_config(&auth_config().argon2).expect("Test Argon2 parameters are valid")
}

pub async fn create_role(db: &DatabaseConnection, name: &str) -> roles::Model {
    roles::ActiveModel {
        name: Set(name.to_string()),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create role")
}

/// Active user with a random username holding `role_id`.
pub async fn create_user(
    db: &DatabaseConnection,
    hasher: &PasswordHasher,
    role_id: i32,
) -> users::Model {
    let suffix: u32 = rand::thread_rng().r#gen();

    users::ActiveModel {
        name: Set(format!("Test User {suffix}")),
        username: Set(format!("user_{suffix}")),
        email: Set(format!("user_{suffix}@realestate.test")),
        phone: Set(None),
        password: Set(hasher.hash(PASSWORD).expect("Failed to hash password")),
        role_id: Set(role_id),
        is_active: Set(true),
        last_login_at: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create user")
}

/// Seeded super admin account
pub async fn admin(db: &DatabaseConnection) -> users::Model {
    users::Entity::find()
        .filter(users::Column::Username.eq("admin"))
        .one(db)
        .await
        .expect("Failed to query admin")
        .expect("Admin is seeded")
}

pub async fn module(db: &DatabaseConnection, name: &str) -> modules::Model {
    modules::Entity::find()
        .filter(modules::Column::Name.eq(name))
        .one(db)
        .await
        .expect("Failed to query module")
        .unwrap_or_else(|| panic!("Module {name} is seeded"))
}

pub async fn submodule(
    db: &DatabaseConnection,
    module_id: i32,
    title: &str,
) -> submodules::Model {
    submodules::Entity::find()
        .filter(submodules::Column::ModuleId.eq(module_id))
        .filter(submodules::Column::Title.eq(title))
        .one(db)
        .await
        .expect("Failed to query submodule")
        .unwrap_or_else(|| panic!("Submodule {title} is seeded"))
}

/// Replace the role's grants with `actions` on each `(module, submodule)` pair, by name.
pub async fn grant(
    db: &DatabaseConnection,
    role_id: i32,
    grants: &[(&str, &str, &[Action])],
) {
    let mut resolved = Vec::with_capacity(grants.len());
    for (module, submodule, actions) in grants {
        let module = self::module(db, module).await;
        let submodule = self::submodule(db, module.id, submodule).await;

        resolved.push(Grant {
            module_id: module.id,
            submodule_id: submodule.id,
            actions: actions.to_vec(),
        });
    }

    PermissionMatrix::new(db.clone())
        .replace_role_permissions(role_id, resolved)
        .await
        .expect("Failed to grant permissions");
}
