use actix_web::test::{TestRequest, call_service, read_body_json};
use serde_json::{Value, json};

use crate::common::prelude::*;
use crate::entities::v1::permissions::Action;
use crate::rbac::{SUPER_ADMIN_ROLE_ID, USER_MANAGEMENT, USER_ROLES};
use crate::testing::instance::{bearer, token, token_for};
use crate::testing::setup;

/// Token of a regular user allowed every action on `User Management / User Roles`.
async fn role_manager(db: &DatabaseConnection) -> String {
    let hasher = setup::password_hasher();
    let role = setup::create_role(db, "Role Manager").await;
    setup::grant(db, role.id, &[(USER_MANAGEMENT, USER_ROLES, &Action::ALL)]).await;
    let user = setup::create_user(db, &hasher, role.id).await;

    token_for(db, user.id).await
}

#[actix_web::test]
async fn super_admin_role_is_hidden_from_other_roles() {
    let (service, db) = crate::service!();
    let admin = token(&db).await;
    let manager = role_manager(&db).await;

    let request = TestRequest::get()
        .uri("/v1/roles")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = read_body_json(call_service(&service, request).await).await;
    let roles = body.as_array().unwrap();
    assert_eq!(roles.len(), 4);
    assert_eq!(roles[0]["id"], SUPER_ADMIN_ROLE_ID);
    assert_eq!(roles[0]["users_count"], 1);
    assert_eq!(roles[0]["permissions_count"], 36);
    assert_eq!(roles[0]["modules_count"], 5);
    assert_eq!(roles[0]["submodules_count"], 9);

    let request = TestRequest::get()
        .uri("/v1/roles")
        .insert_header(bearer(&manager))
        .to_request();
    let body: Value = read_body_json(call_service(&service, request).await).await;
    let roles = body.as_array().unwrap();
    assert_eq!(roles.len(), 3);
    assert!(roles.iter().all(|role| role["id"] != SUPER_ADMIN_ROLE_ID));

    let request = TestRequest::get()
        .uri(&format!("/v1/roles/{SUPER_ADMIN_ROLE_ID}"))
        .insert_header(bearer(&manager))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn show_groups_grants_by_module_and_submodule() {
    let (service, db) = crate::service!();
    let admin = token(&db).await;

    let request = TestRequest::get()
        .uri("/v1/roles/2")
        .insert_header(bearer(&admin))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = read_body_json(response).await;
    assert_eq!(body["name"], "Property Manager");

    let modules = body["modules"].as_array().unwrap();
    assert_eq!(modules.len(), 2);
    assert_eq!(modules[0]["name"], "Properties Management");
    assert_eq!(modules[0]["submodules"][0]["title"], "Properties");
    assert_eq!(
        modules[0]["submodules"][0]["actions"],
        json!(["create", "read", "update", "delete"])
    );
}

#[actix_web::test]
async fn regular_roles_cannot_touch_the_super_admin_role() {
    let (service, db) = crate::service!();
    let manager = role_manager(&db).await;

    let request = TestRequest::put()
        .uri(&format!("/v1/roles/{SUPER_ADMIN_ROLE_ID}"))
        .insert_header(bearer(&manager))
        .set_json(json!({ "name": "Root" }))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::FORBIDDEN);

    let request = TestRequest::put()
        .uri(&format!("/v1/roles/{SUPER_ADMIN_ROLE_ID}/permissions"))
        .insert_header(bearer(&manager))
        .set_json(json!({ "permissions": [] }))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn role_delete_restrictions() {
    let (service, db) = crate::service!();
    let admin = token(&db).await;

    let request = TestRequest::delete()
        .uri(&format!("/v1/roles/{SUPER_ADMIN_ROLE_ID}"))
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::FORBIDDEN);

    let hasher = setup::password_hasher();
    setup::create_user(&db, &hasher, 2).await;

    let request = TestRequest::delete()
        .uri("/v1/roles/2")
        .insert_header(bearer(&admin))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = read_body_json(response).await;
    assert!(body["errors"]["role"].is_array());

    let request = TestRequest::delete()
        .uri("/v1/roles/3")
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::OK);

    let request = TestRequest::get()
        .uri("/v1/roles/3")
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn user_assigned_during_delete_keeps_the_role() {
    use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};

    use crate::entities::v1::{permission_role, users};

    let (service, db) = crate::service!();
    let admin = token(&db).await;
    let grants = || {
        permission_role::Entity::find()
            .filter(permission_role::Column::RoleId.eq(3))
            .count(&db)
    };
    let before = grants().await.unwrap();
    assert!(before > 0);

    // a user lands on the role once its grants start to be detached
    db.execute_unprepared(
        "CREATE TRIGGER late_assignment AFTER DELETE ON permission_role
         BEGIN
             INSERT OR IGNORE INTO users
                 (name, username, email, password, role_id, is_active, created_at, updated_at)
             VALUES
                 ('Late Agent', 'late.agent', 'late@realestate.test', 'x', OLD.role_id, 1,
                  CURRENT_TIMESTAMP, CURRENT_TIMESTAMP);
         END",
    )
    .await
    .unwrap();

    let request = TestRequest::delete()
        .uri("/v1/roles/3")
        .insert_header(bearer(&admin))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = read_body_json(response).await;
    assert!(body["errors"]["role"].is_array());

    assert_eq!(grants().await.unwrap(), before);
    let late = users::Entity::find()
        .filter(users::Column::Username.eq("late.agent"))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(late, 0);

    let request = TestRequest::get()
        .uri("/v1/roles/3")
        .insert_header(bearer(&admin))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn role_names_are_unique() {
    let (service, db) = crate::service!();
    let admin = token(&db).await;

    let request = TestRequest::post()
        .uri("/v1/roles")
        .insert_header(bearer(&admin))
        .set_json(json!({ "name": "Content Editor" }))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let request = TestRequest::post()
        .uri("/v1/roles")
        .insert_header(bearer(&admin))
        .set_json(json!({ "name": "Leasing Agent" }))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let role: Value = read_body_json(response).await;

    let request = TestRequest::put()
        .uri(&format!("/v1/roles/{}", role["id"]))
        .insert_header(bearer(&admin))
        .set_json(json!({ "name": "Leasing Agent" }))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::OK);

    let request = TestRequest::put()
        .uri(&format!("/v1/roles/{}", role["id"]))
        .insert_header(bearer(&admin))
        .set_json(json!({ "name": "Property Manager" }))
        .to_request();
    assert_eq!(
        call_service(&service, request).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[actix_web::test]
async fn replacing_permissions_reports_bad_grants_per_field() {
    let (service, db) = crate::service!();
    let admin = token(&db).await;
    let blog = setup::module(&db, "Blog Management").await;
    let blogs = setup::submodule(&db, blog.id, "Blogs").await;
    let properties = setup::module(&db, "Properties Management").await;

    let request = TestRequest::put()
        .uri("/v1/roles/3/permissions")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "permissions": [
                { "module_id": blog.id, "submodule_id": blogs.id, "actions": ["read", "publish"] },
            ]
        }))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = read_body_json(response).await;
    assert!(body["errors"]["permissions.0.actions.1"].is_array());

    let request = TestRequest::put()
        .uri("/v1/roles/3/permissions")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "permissions": [
                { "module_id": properties.id, "submodule_id": blogs.id, "actions": ["read"] },
            ]
        }))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = read_body_json(response).await;
    assert!(body["errors"]["permissions.0.submodule_id"].is_array());

    // failed replaces leave the previous grants alone
    let request = TestRequest::get()
        .uri("/v1/roles/3")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = read_body_json(call_service(&service, request).await).await;
    assert_eq!(body["modules"].as_array().unwrap().len(), 2);

    let request = TestRequest::put()
        .uri("/v1/roles/3/permissions")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "permissions": [
                {
                    "module_id": blog.id,
                    "submodule_id": blogs.id,
                    "actions": ["read", "read", "update"],
                },
            ]
        }))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_body_json(response).await;
    assert_eq!(body["role_id"], 3);
    assert_eq!(body["permissions"].as_array().unwrap().len(), 2);
}
