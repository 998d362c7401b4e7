use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::{IntoResponses, ToSchema};

use crate::rbac::EffectivePermission;
use crate::responses::v1::role::Role;
use crate::responses::v1::user::User;

#[derive(Clone, Debug, Serialize, ToSchema, IntoResponses)]
#[response(status = 200, description = "Logged in")]
pub struct LoginResponse {
    /// Send as `Authorization: Bearer <token>`
    #[schema(example = "0b7c5e1f2d3a4b5c8d9e0f1a2b3c4d5e")]
    pub token: String,
    pub expired_at: Option<NaiveDateTime>,
    pub user: User,
    pub role: Role,
    pub permissions: BTreeSet<EffectivePermission>,
}

/// Current session
#[derive(Clone, Debug, Serialize, ToSchema, IntoResponses)]
#[response(status = 200, description = "OK")]
pub struct Authenticated {
    pub user: User,
    pub role: Role,
    pub permissions: BTreeSet<EffectivePermission>,
}
