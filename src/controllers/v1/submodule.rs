use crate::common::prelude::*;
use crate::entities::v1::permissions::Action;
use crate::middlewares::v1::auth::Auth;
use crate::rbac::{PermissionMatrix, USER_MANAGEMENT, USER_ROLES};
use crate::requests::v1::submodule::SubmoduleRequest;
use crate::responses::v1::submodule::{CascadeDeleted, Submodule, SubmoduleListItem};

/// Submodules with their module, ordered by title
#[utoipa::path(
    tag = "Submodule",
    security(("token" = [])),
    responses(
        (status = 200, description = "OK", body = Vec<SubmoduleListItem>),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
    )
)]
#[get("/v1/submodules")]
pub async fn index(auth: Auth, matrix: PermissionMatrix) -> Result<impl Responder, Error> {
    let submodules = matrix.list_accessible_submodules(&auth.actor()).await?;

    Ok(Json(
        submodules
            .into_iter()
            .map(SubmoduleListItem::from)
            .collect::<Vec<_>>(),
    ))
}

/// Create a submodule
///
/// Titles are unique within their module only
#[utoipa::path(
    tag = "Submodule",
    security(("token" = [])),
    request_body = SubmoduleRequest,
    responses(
        Submodule,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
#[post("/v1/submodules")]
pub async fn store(
    auth: Auth,
    matrix: PermissionMatrix,
    Json(request): Json<SubmoduleRequest>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USER_ROLES, Action::Create)
        .await?;
    request.validate()?;

    let path = request
        .path
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty());
    let submodule = matrix
        .create_submodule(request.module_id, request.title.trim(), path)
        .await?;

    Ok(Json(Submodule::from(submodule)))
}

#[utoipa::path(
    tag = "Submodule",
    security(("token" = [])),
    params(("id" = i32, Path, description = "Submodule id")),
    responses(
        Submodule,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Submodule not found", body = ErrorResponse),
    )
)]
#[patch("/v1/submodules/{id}/toggle-status")]
pub async fn toggle(
    auth: Auth,
    matrix: PermissionMatrix,
    id: Path<i32>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USER_ROLES, Action::Update)
        .await?;

    let submodule = matrix.toggle_submodule_active(id.into_inner()).await?;

    Ok(Json(Submodule::from(submodule)))
}

/// Delete a submodule with its permissions and their role assignments
#[utoipa::path(
    tag = "Submodule",
    security(("token" = [])),
    params(("id" = i32, Path, description = "Submodule id")),
    responses(
        CascadeDeleted,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Submodule not found", body = ErrorResponse),
        (status = 500, description = "Rolled back", body = ErrorResponse),
    )
)]
#[delete("/v1/submodules/{id}")]
pub async fn delete(
    auth: Auth,
    matrix: PermissionMatrix,
    id: Path<i32>,
) -> Result<impl Responder, Error> {
    auth.authorize(&matrix, USER_MANAGEMENT, USER_ROLES, Action::Delete)
        .await?;

    let report = matrix.delete_submodule(id.into_inner()).await?;

    Ok(Json(CascadeDeleted::new("Submodule deleted", report)))
}
