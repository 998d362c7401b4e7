use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use actix_web::FromRequest;
use actix_web::dev::Payload;

use super::bearer;
use crate::common::prelude::*;
use crate::entities::v1::permissions::Action;
use crate::entities::v1::{roles, tokens, users};
use crate::rbac::{Actor, PermissionMatrix};

/// Authenticated request context.
///
/// Resolved from the bearer token on every request: token → user → role.
/// Unknown or expired tokens and inactive users are rejected with 401.
#[derive(Clone, Debug)]
pub struct Auth {
    pub token: tokens::Model,
    pub user: users::Model,
    pub role: roles::Model,
}

impl Auth {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user.id, self.role.id)
    }

    #[::tracing::instrument(skip(db))]
    pub async fn resolve(db: &DatabaseConnection, token_id: Uuid) -> Result<Self, Error> {
        let (token, user) = tokens::Model::find_with_user(db, token_id)
            .await?
            .ok_or_else(|| Error::unauthorized("Invalid token"))?;

        if token.is_expired(now()) {
            ::tracing::info!(user_id = user.id, "Token expired");
            return Err(Error::unauthorized("Token expired"));
        }

        if !user.is_active {
            ::tracing::info!(user_id = user.id, "Inactive user rejected");
            return Err(Error::unauthorized("Account is inactive"));
        }

        let role = user
            .role(db)
            .await?
            .ok_or_else(|| Error::internal(format!("User {} has no role", user.id)))?;

        Ok(Self { token, user, role })
    }

    /// Fails with 403 unless the role may perform `action` on `module / submodule`.
    pub async fn authorize(
        &self,
        matrix: &PermissionMatrix,
        module: &str,
        submodule: &str,
        action: Action,
    ) -> Result<(), Error> {
        Ok(matrix
            .authorize(&self.actor(), module, submodule, action)
            .await?)
    }
}

impl FromRequest for Auth {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let start = Instant::now();

        let db = req.app_data::<Data<DatabaseConnection>>().cloned();
        let token_id = bearer::token_id(req.headers());

        Box::pin(async move {
            let db = db.ok_or_else(|| Error::internal("Database connection is not registered"))?;
            let auth = Self::resolve(&db, token_id?).await?;

            ::tracing::debug!(user_id = auth.user.id, elapsed = ?start.elapsed(), "Authenticated");

            Ok(auth)
        })
    }
}
