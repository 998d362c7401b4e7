use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoResponses, ToSchema};

use crate::entities::v1::permissions::Action;
use crate::entities::v1::{permissions, roles};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = 200, description = "OK")]
pub struct Role {
    #[schema(example = 2)]
    pub id: i32,
    #[schema(example = "Property Manager")]
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<roles::Model> for Role {
    fn from(role: roles::Model) -> Self {
        Self {
            id: role.id,
            name: role.name,
            created_at: role.created_at,
            updated_at: role.updated_at,
        }
    }
}

/// Role listing row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleSummary {
    pub id: i32,
    #[schema(example = "Content Editor")]
    pub name: String,
    pub users_count: u64,
    pub permissions_count: u64,
    pub modules_count: u64,
    pub submodules_count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleSubmodule {
    pub id: i32,
    #[schema(example = "Properties")]
    pub title: String,
    pub actions: Vec<Action>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleModule {
    pub id: i32,
    #[schema(example = "Properties Management")]
    pub name: String,
    pub submodules: Vec<RoleSubmodule>,
}

/// Role with its grants grouped module → submodule → actions
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = 200, description = "OK")]
pub struct RoleDetail {
    #[serde(flatten)]
    pub role: Role,
    pub modules: Vec<RoleModule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Permission {
    pub id: i32,
    pub module_id: i32,
    pub submodule_id: i32,
    pub action: Action,
}

impl From<permissions::Model> for Permission {
    fn from(permission: permissions::Model) -> Self {
        Self {
            id: permission.id,
            module_id: permission.module_id,
            submodule_id: permission.submodule_id,
            action: permission.action,
        }
    }
}

/// Permissions attached to a role after a replace
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = 200, description = "OK")]
pub struct RolePermissions {
    pub role_id: i32,
    pub permissions: Vec<Permission>,
}
