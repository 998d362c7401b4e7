use crate::common::prelude::*;
use crate::middlewares::v1::auth::Auth;
use crate::rbac::{EffectivePermission, PermissionMatrix};

/// Permissions the current user holds on active modules and submodules
#[utoipa::path(
    tag = "Permission",
    security(("token" = [])),
    responses(
        (status = 200, description = "OK", body = Vec<EffectivePermission>),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
    )
)]
#[get("/v1/permissions/me")]
pub async fn me(auth: Auth, matrix: PermissionMatrix) -> Result<impl Responder, Error> {
    let permissions = matrix.effective_permissions(&auth.actor()).await?;

    Ok(Json(permissions))
}
