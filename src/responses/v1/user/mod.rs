use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoResponses, ToSchema};

use crate::entities::v1::users;
use crate::responses::v1::role::Role;

/// User without credentials
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = 200, description = "OK")]
pub struct User {
    pub id: i32,
    #[schema(example = "Super Administrator")]
    pub name: String,
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "admin@realestate.local")]
    pub email: String,
    pub phone: Option<String>,
    pub role_id: i32,
    pub is_active: bool,
    pub last_login_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl From<users::Model> for User {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            phone: user.phone,
            role_id: user.role_id,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = 200, description = "OK")]
pub struct UserWithRole {
    #[serde(flatten)]
    pub user: User,
    pub role: Option<Role>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = 200, description = "OK")]
pub struct UserPaginationResponse {
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub pages: u64,
    pub data: Vec<User>,
}

/// One-time token accepted by `POST /v1/auth/password/reset`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = 200, description = "OK")]
pub struct PasswordResetIssued {
    #[schema(example = "4f9c2d1be0a84f3c9a7e6d5c4b3a2910")]
    pub token: String,
    pub expired_at: NaiveDateTime,
}
