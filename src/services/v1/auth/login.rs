use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};

use crate::common::prelude::*;
use crate::config::AuthConfig;
use crate::entities::v1::{tokens, users};
use crate::metrics::AppMetrics;
use crate::rbac::{Actor, PermissionMatrix};
use crate::requests::v1::auth::LoginRequest;
use crate::responses::v1::auth::LoginResponse;
use crate::security::PasswordHasher;

const MISMATCH: &str = "These credentials do not match our records";

/// Exchange credentials for a bearer token.
///
/// Unknown identifiers and wrong passwords are indistinguishable to the
/// caller. A stored hash built with outdated Argon2 parameters is replaced.
#[::tracing::instrument(skip_all, fields(identifier = %request.identifier))]
pub async fn login(
    matrix: &PermissionMatrix,
    hasher: &PasswordHasher,
    config: &AuthConfig,
    metrics: Option<&AppMetrics>,
    request: LoginRequest,
) -> Result<LoginResponse, Error> {
    let result = attempt(matrix, hasher, config, request).await;

    if let Some(metrics) = metrics {
        metrics.record_login_attempt(result.is_ok());
    }

    result
}

async fn attempt(
    matrix: &PermissionMatrix,
    hasher: &PasswordHasher,
    config: &AuthConfig,
    request: LoginRequest,
) -> Result<LoginResponse, Error> {
    request.validate()?;

    let db = matrix.connection();
    let user = users::Model::find_by_identifier(db, request.identifier.trim())
        .await?
        .ok_or_else(|| Error::invalid("identifier", MISMATCH))?;

    if !hasher
        .verify(&request.password, &user.password)
        .map_err(Error::internal)?
    {
        ::tracing::info!(user_id = user.id, "Wrong password");
        return Err(Error::invalid("identifier", MISMATCH));
    }

    if !user.is_active {
        let revoked = tokens::Model::revoke_all(db, user.id).await?;
        ::tracing::info!(user_id = user.id, revoked, "Inactive user refused");
        return Err(Error::forbidden("Account is inactive"));
    }

    let role = user
        .role(db)
        .await?
        .ok_or_else(|| Error::internal(format!("User {} has no role", user.id)))?;

    let rehash = match hasher.needs_rehash(&user.password) {
        Ok(true) => Some(hasher.hash(&request.password).map_err(Error::internal)?),
        Ok(false) => None,
        Err(e) => {
            ::tracing::warn!(user_id = user.id, error = %e, "Stored hash is unreadable");
            None
        }
    };

    let token = tokens::Model::issue(db, user.id, config.token_lifetime()).await?;

    let mut model = user.into_active_model();
    model.last_login_at = Set(Some(now()));
    if let Some(hash) = rehash {
        model.password = Set(hash);
    }
    let user = model.update(db).await?;

    let actor = Actor::new(user.id, role.id);
    let permissions = matrix.effective_permissions(&actor).await?;

    ::tracing::info!(user_id = user.id, "Logged in");

    Ok(LoginResponse {
        token: token.bearer(),
        expired_at: token.expired_at,
        user: user.into(),
        role: role.into(),
        permissions,
    })
}
