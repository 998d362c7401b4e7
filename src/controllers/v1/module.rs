use crate::common::prelude::*;
use crate::entities::v1::permissions::Action;
use crate::middlewares::v1::auth::Auth;
use crate::rbac::{PermissionMatrix, USER_MANAGEMENT, USER_ROLES};
use crate::requests::v1::module::ModuleRequest;
use crate::responses::v1::module::{Module, ModuleTree};
use crate::responses::v1::submodule::CascadeDeleted;

/// Modules with their submodules
///
/// Inactive modules and submodules are only listed for the super admin.
#[utoipa::path(
    tag = "Module",
    security(("token" = [])),
    responses(
        (status = 200, description = "OK", body = Vec<ModuleTree>),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
    )
)]
#[get("/v1/modules")]
pub async fn index(auth: Auth, matrix: PermissionMatrix) -> Result<impl Responder, Error> {
    let modules = matrix.list_accessible_modules(&auth.actor()).await?;

    Ok(Json(
        modules.into_iter().map(ModuleTree::from).collect::<Vec<_>>(),
    ))
}

/// Create a module
///
/// Fails when the name is already taken
#[utoipa::path(
    tag = "Module",
    security(("token" = [])),
    request_body = ModuleRequest,
    responses(
        Module,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
#[post("/v1/modules")]
pub async fn store(
    auth: Auth,
    matrix: PermissionMatrix,
    Json(request): Json<ModuleRequest>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USER_ROLES, Action::Create)
        .await?;
    request.validate()?;

    let module = matrix.create_module(request.name.trim()).await?;

    Ok(Json(Module::from(module)))
}

/// Flip a module's active flag
///
/// Submodules keep their own flag
#[utoipa::path(
    tag = "Module",
    security(("token" = [])),
    params(("id" = i32, Path, description = "Module id")),
    responses(
        Module,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
    )
)]
#[patch("/v1/modules/{id}/toggle-status")]
pub async fn toggle(
    auth: Auth,
    matrix: PermissionMatrix,
    id: Path<i32>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USER_ROLES, Action::Update)
        .await?;

    let module = matrix.toggle_module_active(id.into_inner()).await?;

    Ok(Json(Module::from(module)))
}

/// Delete a module
///
/// Removes its submodules, their permissions and every role assignment of
/// those permissions in one transaction
#[utoipa::path(
    tag = "Module",
    security(("token" = [])),
    params(("id" = i32, Path, description = "Module id")),
    responses(
        CascadeDeleted,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 500, description = "Rolled back", body = ErrorResponse),
    )
)]
#[delete("/v1/modules/{id}")]
pub async fn delete(
    auth: Auth,
    matrix: PermissionMatrix,
    id: Path<i32>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USER_ROLES, Action::Delete)
        .await?;

    let report = matrix.delete_module(id.into_inner()).await?;

    Ok(Json(CascadeDeleted::new("Module deleted", report)))
}
