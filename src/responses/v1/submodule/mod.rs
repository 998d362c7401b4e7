use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoResponses, ToSchema};

use crate::entities::v1::submodules;
use crate::rbac::{CascadeReport, SubmoduleWithModule};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = 200, description = "OK")]
pub struct Submodule {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub module_id: i32,
    #[schema(example = "Properties")]
    pub title: String,
    #[schema(example = "/admin/properties")]
    pub path: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<submodules::Model> for Submodule {
    fn from(submodule: submodules::Model) -> Self {
        Self {
            id: submodule.id,
            module_id: submodule.module_id,
            title: submodule.title,
            path: submodule.path,
            is_active: submodule.is_active,
            created_at: submodule.created_at,
            updated_at: submodule.updated_at,
        }
    }
}

/// Flat submodule row with its module
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmoduleListItem {
    pub id: i32,
    pub module_id: i32,
    #[schema(example = "Blog Management")]
    pub module_name: String,
    pub module_is_active: bool,
    #[schema(example = "Blogs")]
    pub title: String,
    pub path: Option<String>,
    pub is_active: bool,
}

impl From<SubmoduleWithModule> for SubmoduleListItem {
    fn from(row: SubmoduleWithModule) -> Self {
        Self {
            id: row.id,
            module_id: row.module_id,
            module_name: row.module_name,
            module_is_active: row.module_is_active,
            title: row.title,
            path: row.path,
            is_active: row.is_active,
        }
    }
}

/// Acknowledgement of a cascading delete
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = 200, description = "Deleted together with dependent rows")]
pub struct CascadeDeleted {
    pub success: bool,
    #[schema(example = "Module deleted")]
    pub message: String,
    pub deleted: CascadeReport,
}

impl CascadeDeleted {
    pub fn new(message: impl Into<String>, deleted: CascadeReport) -> Self {
        Self {
            success: true,
            message: message.into(),
            deleted,
        }
    }
}
