use crate::common::prelude::*;
use crate::entities::v1::permissions::Action;
use crate::middlewares::v1::auth::Auth;
use crate::rbac::{PermissionMatrix, USER_MANAGEMENT, USERS};
use crate::config::AuthConfig;
use crate::requests::v1::user::{
    UserPaginationRequest, UserRoleRequest, UserStoreRequest, UserUpdateGeneralInformationRequest,
    UserUpdatePasswordRequest,
};
use crate::responses::v1::user::{PasswordResetIssued, User, UserPaginationResponse, UserWithRole};
use crate::security::PasswordHasher;
use crate::services;

/// Paginate users
#[utoipa::path(
    tag = "User",
    security(("token" = [])),
    params(UserPaginationRequest),
    responses(
        UserPaginationResponse,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
    )
)]
#[get("/v1/users")]
pub async fn paginate(
    auth: Auth,
    matrix: PermissionMatrix,
    db: Data<DatabaseConnection>,
    Query(request): Query<UserPaginationRequest>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USERS, Action::Read)
        .await?;

    let response = services::v1::user::paginate::paginate(&db, &auth.actor(), request).await?;
    Ok(Json(response))
}

/// Store new user
///
/// Fails if username or email already exist
#[utoipa::path(
    tag = "User",
    security(("token" = [])),
    request_body = UserStoreRequest,
    responses(
        UserWithRole,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
#[post("/v1/users")]
pub async fn store(
    auth: Auth,
    matrix: PermissionMatrix,
    db: Data<DatabaseConnection>,
    hasher: Data<PasswordHasher>,
    Json(request): Json<UserStoreRequest>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USERS, Action::Create)
        .await?;

    let response =
        services::v1::user::store::store(&db, &hasher, &auth.actor(), request).await?;
    Ok(Json(response))
}

/// Show user with role
#[utoipa::path(
    tag = "User",
    security(("token" = [])),
    params(("id" = i32, Path, description = "User id")),
    responses(
        UserWithRole,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
#[get("/v1/users/{id}")]
pub async fn show(
    auth: Auth,
    matrix: PermissionMatrix,
    db: Data<DatabaseConnection>,
    id: Path<i32>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USERS, Action::Read)
        .await?;

    let response = services::v1::user::show::show(&db, &auth.actor(), id.into_inner()).await?;
    Ok(Json(response))
}

/// Assign a role to the user
#[utoipa::path(
    tag = "User",
    security(("token" = [])),
    params(("id" = i32, Path, description = "User id")),
    request_body = UserRoleRequest,
    responses(
        UserWithRole,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
#[put("/v1/users/{id}/role")]
pub async fn assign_role(
    auth: Auth,
    matrix: PermissionMatrix,
    db: Data<DatabaseConnection>,
    id: Path<i32>,
    Json(request): Json<UserRoleRequest>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USERS, Action::Update)
        .await?;

    let response =
        services::v1::user::assign_role::assign_role(&db, &auth.actor(), id.into_inner(), request)
            .await?;
    Ok(Json(response))
}

/// Activate or deactivate the user
///
/// Deactivation signs the user out everywhere
#[utoipa::path(
    tag = "User",
    security(("token" = [])),
    params(("id" = i32, Path, description = "User id")),
    responses(
        User,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Own account", body = ErrorResponse),
    )
)]
#[patch("/v1/users/{id}/toggle-status")]
pub async fn toggle(
    auth: Auth,
    matrix: PermissionMatrix,
    db: Data<DatabaseConnection>,
    id: Path<i32>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USERS, Action::Update)
        .await?;

    let response = services::v1::user::toggle::toggle(&db, &auth.actor(), id.into_inner()).await?;
    Ok(Json(response))
}

#[utoipa::path(
    tag = "User",
    security(("token" = [])),
    params(("id" = i32, Path, description = "User id")),
    responses(
        Success,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Own account", body = ErrorResponse),
    )
)]
#[delete("/v1/users/{id}")]
pub async fn delete(
    auth: Auth,
    matrix: PermissionMatrix,
    db: Data<DatabaseConnection>,
    id: Path<i32>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USERS, Action::Delete)
        .await?;

    let response = services::v1::user::delete::delete(&db, &auth.actor(), id.into_inner()).await?;
    Ok(response)
}

/// Change name, username, email or phone of a user
#[utoipa::path(
    tag = "User",
    security(("token" = [])),
    params(("id" = i32, Path, description = "User id")),
    request_body = UserUpdateGeneralInformationRequest,
    responses(
        UserWithRole,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
#[put("/v1/users/{id}/edit")]
pub async fn update_general_information(
    auth: Auth,
    matrix: PermissionMatrix,
    db: Data<DatabaseConnection>,
    id: Path<i32>,
    Json(request): Json<UserUpdateGeneralInformationRequest>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USERS, Action::Update)
        .await?;

    let response = services::v1::user::update_general_information::update(
        &db,
        &auth.actor(),
        id.into_inner(),
        request,
    )
    .await?;
    Ok(Json(response))
}

/// Issue a one-time password reset token for a user
///
/// The previous token of the same user stops working
#[utoipa::path(
    tag = "User",
    security(("token" = [])),
    params(("id" = i32, Path, description = "User id")),
    responses(
        PasswordResetIssued,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden or inactive user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
#[post("/v1/users/{id}/password-reset")]
pub async fn password_reset(
    auth: Auth,
    matrix: PermissionMatrix,
    db: Data<DatabaseConnection>,
    config: Data<AuthConfig>,
    id: Path<i32>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USERS, Action::Update)
        .await?;

    let response =
        services::v1::user::password_reset::issue(&db, &config, &auth.actor(), id.into_inner())
            .await?;
    Ok(Json(response))
}

/// Current user with role
#[utoipa::path(
    tag = "User",
    security(("token" = [])),
    responses(
        UserWithRole,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
    )
)]
#[get("/v1/user/profile")]
pub async fn profile(auth: Auth) -> Result<impl Responder, Error> {
    Ok(Json(services::v1::user::profile::show(auth)))
}

/// Update own name, username, email or phone
#[utoipa::path(
    tag = "User",
    security(("token" = [])),
    request_body = UserUpdateGeneralInformationRequest,
    responses(
        UserWithRole,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
#[put("/v1/user/profile")]
pub async fn update_profile(
    auth: Auth,
    db: Data<DatabaseConnection>,
    Json(request): Json<UserUpdateGeneralInformationRequest>,
) -> Result<impl Responder, Error> {
    let response = services::v1::user::profile::update(&db, auth, request).await?;
    Ok(Json(response))
}

/// Change own password
///
/// Other sessions are signed out, the current token stays valid
#[utoipa::path(
    tag = "User",
    security(("token" = [])),
    request_body = UserUpdatePasswordRequest,
    responses(
        Success,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
#[put("/v1/user/password")]
pub async fn update_password(
    auth: Auth,
    db: Data<DatabaseConnection>,
    hasher: Data<PasswordHasher>,
    Json(request): Json<UserUpdatePasswordRequest>,
) -> Result<impl Responder, Error> {
    let response =
        services::v1::user::update_password::update(&db, &hasher, &auth, request).await?;
    Ok(response)
}
