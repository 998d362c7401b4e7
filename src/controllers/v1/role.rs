use crate::common::prelude::*;
use crate::entities::v1::permissions::Action;
use crate::middlewares::v1::auth::Auth;
use crate::rbac::{PermissionMatrix, USER_MANAGEMENT, USER_ROLES};
use crate::requests::v1::role::{RolePermissionsRequest, RoleRequest};
use crate::responses::v1::role::{Role, RoleDetail, RolePermissions, RoleSummary};
use crate::services;

/// Roles with usage counts
#[utoipa::path(
    tag = "Role",
    security(("token" = [])),
    responses(
        (status = 200, description = "OK", body = Vec<RoleSummary>),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
    )
)]
#[get("/v1/roles")]
pub async fn index(
    auth: Auth,
    matrix: PermissionMatrix,
    db: Data<DatabaseConnection>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USER_ROLES, Action::Read)
        .await?;

    let response = services::v1::role::index::index(&db, &auth.actor()).await?;
    Ok(Json(response))
}

/// Store new role
///
/// Fails if the name already exists
#[utoipa::path(
    tag = "Role",
    security(("token" = [])),
    request_body = RoleRequest,
    responses(
        Role,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
#[post("/v1/roles")]
pub async fn store(
    auth: Auth,
    matrix: PermissionMatrix,
    db: Data<DatabaseConnection>,
    Json(request): Json<RoleRequest>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USER_ROLES, Action::Create)
        .await?;

    let response = services::v1::role::store::store(&db, request).await?;
    Ok(Json(response))
}

/// Show role with its module → submodule → actions tree
#[utoipa::path(
    tag = "Role",
    security(("token" = [])),
    params(("id" = i32, Path, description = "Role id")),
    responses(
        RoleDetail,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse),
    )
)]
#[get("/v1/roles/{id}")]
pub async fn show(
    auth: Auth,
    matrix: PermissionMatrix,
    db: Data<DatabaseConnection>,
    id: Path<i32>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USER_ROLES, Action::Read)
        .await?;

    let response = services::v1::role::show::show(&db, &auth.actor(), id.into_inner()).await?;
    Ok(Json(response))
}

/// Rename role
#[utoipa::path(
    tag = "Role",
    security(("token" = [])),
    params(("id" = i32, Path, description = "Role id")),
    request_body = RoleRequest,
    responses(
        Role,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
#[put("/v1/roles/{id}")]
pub async fn update(
    auth: Auth,
    matrix: PermissionMatrix,
    db: Data<DatabaseConnection>,
    id: Path<i32>,
    Json(request): Json<RoleRequest>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USER_ROLES, Action::Update)
        .await?;

    let response =
        services::v1::role::update::update(&db, &auth.actor(), id.into_inner(), request).await?;
    Ok(Json(response))
}

/// Delete role
///
/// Fails for the super admin role and while users are assigned to it
#[utoipa::path(
    tag = "Role",
    security(("token" = [])),
    params(("id" = i32, Path, description = "Role id")),
    responses(
        Success,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse),
        (status = 422, description = "Role still assigned", body = ErrorResponse),
    )
)]
#[delete("/v1/roles/{id}")]
pub async fn delete(
    auth: Auth,
    matrix: PermissionMatrix,
    db: Data<DatabaseConnection>,
    id: Path<i32>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USER_ROLES, Action::Delete)
        .await?;

    let response = services::v1::role::delete::delete(&db, &auth.actor(), id.into_inner()).await?;
    Ok(response)
}

/// Replace every grant of the role
///
/// Grants left out of the request are revoked
#[utoipa::path(
    tag = "Role",
    security(("token" = [])),
    params(("id" = i32, Path, description = "Role id")),
    request_body = RolePermissionsRequest,
    responses(
        RolePermissions,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse),
        (status = 422, description = "Invalid grants", body = ErrorResponse),
        (status = 500, description = "Rolled back", body = ErrorResponse),
    )
)]
#[put("/v1/roles/{id}/permissions")]
pub async fn permissions(
    auth: Auth,
    matrix: PermissionMatrix,
    id: Path<i32>,
    Json(request): Json<RolePermissionsRequest>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USER_ROLES, Action::Update)
        .await?;

    let response = services::v1::role::permissions::update_permissions(
        &matrix,
        &auth.actor(),
        id.into_inner(),
        request,
    )
    .await?;
    Ok(Json(response))
}
