use crate::common::prelude::*;
use crate::config::AuthConfig;
use crate::metrics::AppMetrics;
use crate::middlewares::v1::auth::Auth;
use crate::rbac::PermissionMatrix;
use crate::requests::v1::auth::{LoginRequest, PasswordResetRequest};
use crate::responses::v1::auth::{Authenticated, LoginResponse};
use crate::security::PasswordHasher;
use crate::services;

/// Login with email or username
#[utoipa::path(
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        LoginResponse,
        (status = 403, description = "Account is inactive", body = ErrorResponse),
        (status = 422, description = "Credentials do not match", body = ErrorResponse),
    )
)]
#[post("/v1/auth/login")]
pub async fn login(
    matrix: PermissionMatrix,
    hasher: Data<PasswordHasher>,
    config: Data<AuthConfig>,
    metrics: Option<Data<AppMetrics>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl Responder, Error> {
    let response = services::v1::auth::login::login(
        &matrix,
        &hasher,
        &config,
        metrics.as_deref().map(|v| &**v),
        request,
    )
    .await?;
    Ok(Json(response))
}

/// Current user with role and effective permissions
#[utoipa::path(
    tag = "Auth",
    security(("token" = [])),
    responses(
        Authenticated,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
    )
)]
#[get("/v1/auth/me")]
pub async fn authenticated(auth: Auth, matrix: PermissionMatrix) -> Result<impl Responder, Error> {
    let response = services::v1::auth::authenticated::authenticated(&matrix, auth).await?;
    Ok(Json(response))
}

/// Revoke every token of the current user
#[utoipa::path(
    tag = "Auth",
    security(("token" = [])),
    responses(
        Success,
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
    )
)]
#[delete("/v1/auth/logout")]
pub async fn logout(auth: Auth, db: Data<DatabaseConnection>) -> Result<impl Responder, Error> {
    let response = services::v1::auth::logout::logout(&db, &auth).await?;
    Ok(response)
}

/// Set a new password with a token issued by an administrator
///
/// Every session of the user is revoked
#[utoipa::path(
    tag = "Auth",
    request_body = PasswordResetRequest,
    responses(
        Success,
        (status = 400, description = "Token is invalid or has expired", body = ErrorResponse),
        (status = 403, description = "Account is inactive", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    )
)]
#[post("/v1/auth/password/reset")]
pub async fn reset_password(
    db: Data<DatabaseConnection>,
    hasher: Data<PasswordHasher>,
    Json(request): Json<PasswordResetRequest>,
) -> Result<impl Responder, Error> {
    let response = services::v1::auth::reset_password::reset(&db, &hasher, request).await?;
    Ok(response)
}
