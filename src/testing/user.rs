use actix_web::test::{TestRequest, call_service, read_body_json};
use serde_json::{Value, json};

use crate::common::prelude::*;
use crate::entities::v1::permissions::Action;
use crate::rbac::{SUPER_ADMIN_ROLE_ID, USER_MANAGEMENT, USERS};
use crate::testing::instance::{bearer, token, token_for};
use crate::testing::setup;

fn payload(username: &str, role_id: i32) -> Value {
    json!({
        "name": "Jane Agent",
        "username": username,
        "email": format!("{username}@realestate.test"),
        "phone": "+62 812-3456-7890",
        "password": "Secret2025",
        "password_confirmation": "Secret2025",
        "role_id": role_id,
    })
}

#[actix_web::test]
async fn store_hashes_password_and_rejects_duplicates() {
    let (service, db) = crate::service!();
    let admin = token(&db).await;

    let request = TestRequest::post()
        .uri("/v1/users")
        .insert_header(bearer(&admin))
        .set_json(payload("jane.agent", 2))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = read_body_json(response).await;
    assert_eq!(body["username"], "jane.agent");
    assert_eq!(body["role"]["name"], "Property Manager");
    assert!(body.get("password").is_none());

    let request = TestRequest::post()
        .uri("/v1/users")
        .insert_header(bearer(&admin))
        .set_json(payload("jane.agent", 2))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = read_body_json(response).await;
    assert!(body["errors"]["username"].is_array());
    assert!(body["errors"]["email"].is_array());
}

#[actix_web::test]
async fn unknown_role_is_a_field_error() {
    let (service, db) = crate::service!();
    let admin = token(&db).await;

    let request = TestRequest::post()
        .uri("/v1/users")
        .insert_header(bearer(&admin))
        .set_json(payload("nobody", 999))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = read_body_json(response).await;
    assert!(body["errors"]["role_id"].is_array());
}

#[actix_web::test]
async fn only_super_admins_hand_out_the_super_admin_role() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();
    let role = setup::create_role(&db, "HR").await;
    setup::grant(&db, role.id, &[(USER_MANAGEMENT, USERS, &Action::ALL)]).await;
    let hr = setup::create_user(&db, &hasher, role.id).await;
    let hr = token_for(&db, hr.id).await;

    let request = TestRequest::post()
        .uri("/v1/users")
        .insert_header(bearer(&hr))
        .set_json(payload("sneaky", SUPER_ADMIN_ROLE_ID))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::FORBIDDEN);

    let agent = setup::create_user(&db, &hasher, 2).await;
    let request = TestRequest::put()
        .uri(&format!("/v1/users/{}/role", agent.id))
        .insert_header(bearer(&hr))
        .set_json(json!({ "role_id": SUPER_ADMIN_ROLE_ID }))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::FORBIDDEN);

    let request = TestRequest::put()
        .uri(&format!("/v1/users/{}/role", agent.id))
        .insert_header(bearer(&hr))
        .set_json(json!({ "role_id": 3 }))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_body_json(response).await;
    assert_eq!(body["role_id"], 3);

    let admin = setup::admin(&db).await;
    let request = TestRequest::delete()
        .uri(&format!("/v1/users/{}", admin.id))
        .insert_header(bearer(&hr))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn deactivation_revokes_sessions() {
    let (service, db) = crate::service!();
    let admin = token(&db).await;
    let hasher = setup::password_hasher();
    let agent = setup::create_user(&db, &hasher, 2).await;
    let agent_token = token_for(&db, agent.id).await;

    let request = TestRequest::patch()
        .uri(&format!("/v1/users/{}/toggle-status", agent.id))
        .insert_header(bearer(&admin))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_body_json(response).await;
    assert_eq!(body["is_active"], false);

    let request = TestRequest::get()
        .uri("/v1/auth/me")
        .insert_header(bearer(&agent_token))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn users_cannot_deactivate_or_delete_themselves() {
    let (service, db) = crate::service!();
    let token = token(&db).await;
    let admin = setup::admin(&db).await;

    let request = TestRequest::patch()
        .uri(&format!("/v1/users/{}/toggle-status", admin.id))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(
        call_service(&service, request).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );

    let request = TestRequest::delete()
        .uri(&format!("/v1/users/{}", admin.id))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(
        call_service(&service, request).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[actix_web::test]
async fn paginate_searches_and_hides_super_admins() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();
    for _ in 0..3 {
        setup::create_user(&db, &hasher, 2).await;
    }
    let role = setup::create_role(&db, "HR").await;
    setup::grant(&db, role.id, &[(USER_MANAGEMENT, USERS, &[Action::Read])]).await;
    let hr = setup::create_user(&db, &hasher, role.id).await;
    let hr = token_for(&db, hr.id).await;
    let admin = token(&db).await;

    let request = TestRequest::get()
        .uri("/v1/users?per_page=2")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = read_body_json(call_service(&service, request).await).await;
    assert_eq!(body["total"], 5);
    assert_eq!(body["pages"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let request = TestRequest::get()
        .uri("/v1/users")
        .insert_header(bearer(&hr))
        .to_request();
    let body: Value = read_body_json(call_service(&service, request).await).await;
    assert_eq!(body["total"], 4);

    let request = TestRequest::get()
        .uri("/v1/users?search=admin%40realestate")
        .insert_header(bearer(&admin))
        .to_request();
    let body: Value = read_body_json(call_service(&service, request).await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["username"], "admin");
}

#[actix_web::test]
async fn paginate_past_the_last_page_is_empty() {
    let (service, db) = crate::service!();
    let admin = token(&db).await;

    let request = TestRequest::get()
        .uri(&format!("/v1/users?page={}", u64::MAX))
        .insert_header(bearer(&admin))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = read_body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["page"], u64::MAX);
    assert!(body["data"].as_array().unwrap().is_empty());
}

fn general_information(username: &str) -> Value {
    json!({
        "name": "Renamed Agent",
        "username": username,
        "email": format!("{username}@REALESTATE.test"),
        "phone": "  ",
    })
}

#[actix_web::test]
async fn profile_shows_and_updates_the_signed_in_user() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();
    let agent = setup::create_user(&db, &hasher, 2).await;
    let agent_token = token_for(&db, agent.id).await;

    let request = TestRequest::get()
        .uri("/v1/user/profile")
        .insert_header(bearer(&agent_token))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_body_json(response).await;
    assert_eq!(body["id"], agent.id);
    assert_eq!(body["role"]["name"], "Property Manager");
    assert!(body.get("password").is_none());

    let request = TestRequest::put()
        .uri("/v1/user/profile")
        .insert_header(bearer(&agent_token))
        .set_json(general_information("renamed.agent"))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_body_json(response).await;
    assert_eq!(body["name"], "Renamed Agent");
    assert_eq!(body["email"], "renamed.agent@realestate.test");
    assert!(body["phone"].is_null());

    // keeping one's own email is not a duplicate
    let request = TestRequest::put()
        .uri("/v1/user/profile")
        .insert_header(bearer(&agent_token))
        .set_json(general_information("renamed.agent"))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::OK);

    let mut taken = general_information("renamed.agent");
    taken["email"] = json!("admin@realestate.local");
    let request = TestRequest::put()
        .uri("/v1/user/profile")
        .insert_header(bearer(&agent_token))
        .set_json(taken)
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = read_body_json(response).await;
    assert!(body["errors"]["email"].is_array());

    let request = TestRequest::get().uri("/v1/user/profile").to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn edit_changes_general_information_only() {
    let (service, db) = crate::service!();
    let admin = token(&db).await;
    let hasher = setup::password_hasher();
    let agent = setup::create_user(&db, &hasher, 2).await;

    let mut edit = general_information("edited.agent");
    edit["phone"] = json!(" +62 811-0000-0000 ");
    let request = TestRequest::put()
        .uri(&format!("/v1/users/{}/edit", agent.id))
        .insert_header(bearer(&admin))
        .set_json(edit)
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_body_json(response).await;
    assert_eq!(body["username"], "edited.agent");
    assert_eq!(body["phone"], "+62 811-0000-0000");
    assert_eq!(body["role_id"], 2);
    assert_eq!(body["is_active"], true);

    let request = TestRequest::put()
        .uri(&format!("/v1/users/{}/edit", agent.id))
        .insert_header(bearer(&admin))
        .set_json(general_information("admin"))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = read_body_json(response).await;
    assert!(body["errors"]["username"].is_array());

    let request = TestRequest::put()
        .uri("/v1/users/999/edit")
        .insert_header(bearer(&admin))
        .set_json(general_information("ghost"))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn only_super_admins_edit_super_admins() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();
    let role = setup::create_role(&db, "HR").await;
    setup::grant(&db, role.id, &[(USER_MANAGEMENT, USERS, &[Action::Read])]).await;
    let hr = setup::create_user(&db, &hasher, role.id).await;
    let hr = token_for(&db, hr.id).await;
    let admin = setup::admin(&db).await;

    // read access alone does not allow edits
    let request = TestRequest::put()
        .uri(&format!("/v1/users/{}/edit", admin.id))
        .insert_header(bearer(&hr))
        .set_json(general_information("hijacked"))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::FORBIDDEN);

    setup::grant(&db, role.id, &[(USER_MANAGEMENT, USERS, &Action::ALL)]).await;
    let request = TestRequest::put()
        .uri(&format!("/v1/users/{}/edit", admin.id))
        .insert_header(bearer(&hr))
        .set_json(general_information("hijacked"))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::FORBIDDEN);

    let request = TestRequest::post()
        .uri(&format!("/v1/users/{}/password-reset", admin.id))
        .insert_header(bearer(&hr))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::FORBIDDEN);

    assert_eq!(setup::admin(&db).await.username, "admin");
}

#[actix_web::test]
async fn password_change_keeps_only_the_current_session() {
    let (service, db) = crate::service!();
    let hasher = setup::password_hasher();
    let agent = setup::create_user(&db, &hasher, 2).await;
    let current = token_for(&db, agent.id).await;
    let other = token_for(&db, agent.id).await;

    let request = TestRequest::put()
        .uri("/v1/user/password")
        .insert_header(bearer(&current))
        .set_json(json!({
            "current_password": "not-my-password",
            "new_password": "Changed2025",
            "password_confirmation": "Changed2025",
        }))
        .to_request();
    let response = call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = read_body_json(response).await;
    assert_eq!(
        body["errors"]["current_password"][0],
        "Current password is incorrect"
    );

    let request = TestRequest::put()
        .uri("/v1/user/password")
        .insert_header(bearer(&current))
        .set_json(json!({
            "current_password": setup::PASSWORD,
            "new_password": "Changed2025",
            "password_confirmation": "Changed2025",
        }))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::OK);

    for (token, status) in [(&current, StatusCode::OK), (&other, StatusCode::UNAUTHORIZED)] {
        let request = TestRequest::get()
            .uri("/v1/auth/me")
            .insert_header(bearer(token))
            .to_request();
        assert_eq!(call_service(&service, request).await.status(), status);
    }

    let request = TestRequest::post()
        .uri("/v1/auth/login")
        .set_json(json!({ "identifier": agent.username, "password": "Changed2025" }))
        .to_request();
    assert_eq!(call_service(&service, request).await.status(), StatusCode::OK);
}
