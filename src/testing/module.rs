use actix_web::test::{TestRequest, call_service, read_body_json};
use serde_json::{Value, json};

use crate::common::prelude::*;
use crate::entities::v1::permissions::Action;
use crate::rbac::{USER_MANAGEMENT, USER_ROLES};
use crate::testing::instance::{bearer, token, token_for};
use crate::testing::setup;

#[actix_web::test]
async fn listing_requires_a_token() {
    let (service, _db) = crate::service!();

    let request = TestRequest::get().uri("/v1/modules").to_request();
    let response = call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn admin_lists_every_module_with_submodules() {
    let (service, db) = crate::service!();
    let token = token(&db).await;

    let request = TestRequest::get()
        .uri("/v1/modules")
        .insert_header(bearer(&token))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = read_body_json(response).await;
    let modules = body.as_array().unwrap();
    assert_eq!(modules.len(), 5);
    assert_eq!(modules[0]["name"], "Properties Management");
    assert_eq!(modules[0]["submodules"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn duplicate_module_name_is_a_field_error() {
    let (service, db) = crate::service!();
    let token = token(&db).await;

    let request = TestRequest::post()
        .uri("/v1/modules")
        .insert_header(bearer(&token))
        .set_json(json!({ "name": "Agent Management" }))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = read_body_json(response).await;
    assert_eq!(body["name"], "Agent Management");
    assert_eq!(body["is_active"], true);

    let request = TestRequest::post()
        .uri("/v1/modules")
        .insert_header(bearer(&token))
        .set_json(json!({ "name": "Agent Management" }))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = read_body_json(response).await;
    assert_eq!(body["errors"]["name"][0], "Name already exists");
}

#[actix_web::test]
async fn mutations_need_user_roles_permissions() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();
    let role = setup::create_role(&db, "Reader").await;
    setup::grant(&db, role.id, &[(USER_MANAGEMENT, USER_ROLES, &[Action::Read])]).await;
    let user = setup::create_user(&db, &hasher, role.id).await;
    let token = token_for(&db, user.id).await;

    let request = TestRequest::post()
        .uri("/v1/modules")
        .insert_header(bearer(&token))
        .set_json(json!({ "name": "Agent Management" }))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: Value = read_body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 403);

    let request = TestRequest::delete()
        .uri("/v1/modules/1")
        .insert_header(bearer(&token))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn inactive_modules_are_hidden_from_regular_roles() {
    let (service, db) = crate::service!();
    let admin = token(&db).await;
    let hasher = setup::password_hasher();
    let editor = setup::create_user(&db, &hasher, 3).await;
    let editor = token_for(&db, editor.id).await;
    let blog = setup::module(&db, "Blog Management").await;

    let request = TestRequest::patch()
        .uri(&format!("/v1/modules/{}/toggle-status", blog.id))
        .insert_header(bearer(&admin))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_body_json(response).await;
    assert_eq!(body["is_active"], false);

    for (token, expected) in [(&editor, 4), (&admin, 5)] {
        let request = TestRequest::get()
            .uri("/v1/modules")
            .insert_header(bearer(token))
            .to_request();
        let body: Value = read_body_json(call_service(&service, request).await).await;

        assert_eq!(body.as_array().unwrap().len(), expected);
    }

    let request = TestRequest::get()
        .uri("/v1/permissions/me")
        .insert_header(bearer(&editor))
        .to_request();
    let body: Value = read_body_json(call_service(&service, request).await).await;
    let permissions = body.as_array().unwrap();
    assert_eq!(permissions.len(), 4);
    assert!(permissions.iter().all(|p| p["module"] == "Testimonial Management"));
}

#[actix_web::test]
async fn deleting_a_module_reports_the_cascade() {
    let (service, db) = crate::service!();
    let token = token(&db).await;
    let blog = setup::module(&db, "Blog Management").await;

    let request = TestRequest::delete()
        .uri(&format!("/v1/modules/{}", blog.id))
        .insert_header(bearer(&token))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = read_body_json(response).await;
    assert_eq!(body["deleted"]["submodules"], 3);
    assert_eq!(body["deleted"]["permissions"], 12);
    // super admin and content editor both held all twelve
    assert_eq!(body["deleted"]["assignments"], 24);

    let request = TestRequest::delete()
        .uri(&format!("/v1/modules/{}", blog.id))
        .insert_header(bearer(&token))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn submodules_are_listed_flat_by_title() {
    let (service, db) = crate::service!();
    let token = token(&db).await;
    let blog = setup::module(&db, "Blog Management").await;

    let request = TestRequest::post()
        .uri("/v1/submodules")
        .insert_header(bearer(&token))
        .set_json(json!({ "module_id": blog.id, "title": "Authors", "path": "/admin/authors" }))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = TestRequest::get()
        .uri("/v1/submodules")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = read_body_json(call_service(&service, request).await).await;
    let submodules = body.as_array().unwrap();

    assert_eq!(submodules.len(), 10);
    assert_eq!(submodules[0]["title"], "Authors");
    assert_eq!(submodules[0]["module_name"], "Blog Management");
    assert_eq!(submodules[0]["path"], "/admin/authors");
}

#[actix_web::test]
async fn submodule_title_is_unique_per_module() {
    let (service, db) = crate::service!();
    let token = token(&db).await;
    let blog = setup::module(&db, "Blog Management").await;

    let request = TestRequest::post()
        .uri("/v1/submodules")
        .insert_header(bearer(&token))
        .set_json(json!({ "module_id": blog.id, "title": "Blogs" }))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = read_body_json(response).await;
    assert!(body["errors"]["title"].is_array());

    let request = TestRequest::post()
        .uri("/v1/submodules")
        .insert_header(bearer(&token))
        .set_json(json!({ "module_id": 999, "title": "Blogs" }))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let (service, db) = crate::service!();
    let token = token(&db).await;

    let request = TestRequest::post()
        .uri("/v1/modules")
        .insert_header(bearer(&token))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"name\":")
        .to_request();
    let response = call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
