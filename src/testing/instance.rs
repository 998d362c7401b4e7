use sea_orm::DatabaseConnection;

use crate::entities::v1::tokens;
use crate::testing::setup;

/// Bearer token for `user_id`, valid for an hour.
pub async fn token_for(db: &DatabaseConnection, user_id: i32) -> String {
    tokens::Model::issue(db, user_id, chrono::Duration::hours(1))
        .await
        .expect("Failed to issue token")
        .bearer()
}

/// Bearer token for the seeded super admin.
pub async fn token(db: &DatabaseConnection) -> String {
    let admin = setup::admin(db).await;

    token_for(db, admin.id).await
}

/// `Authorization` header pair for `token`
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Initialised service over a fresh database: `let (service, db) = service!();`
#[macro_export]
macro_rules! service {
    () => {{
        let db = $crate::testing::setup::database().await;
        let app = ::actix_web::App::new()
            .app_data(::actix_web::web::Data::new(db.clone()))
            .app_data(::actix_web::web::Data::new(
                $crate::testing::setup::password_hasher(),
            ))
            .app_data(::actix_web::web::Data::new(
                $crate::testing::setup::auth_config(),
            ))
            .configure($crate::router::route);

        let service = ::actix_web::test::init_service(app).await;

        (service, db)
    }};
}
