use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoResponses, ToSchema};

use crate::entities::v1::modules;
use crate::rbac::ModuleWithSubmodules;
use crate::responses::v1::submodule::Submodule;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema, IntoResponses)]
#[response(status = 200, description = "OK")]
pub struct Module {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Properties Management")]
    pub name: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<modules::Model> for Module {
    fn from(module: modules::Model) -> Self {
        Self {
            id: module.id,
            name: module.name,
            is_active: module.is_active,
            created_at: module.created_at,
            updated_at: module.updated_at,
        }
    }
}

/// Module with the submodules visible to the caller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ModuleTree {
    #[serde(flatten)]
    pub module: Module,
    pub submodules: Vec<Submodule>,
}

impl From<ModuleWithSubmodules> for ModuleTree {
    fn from(tree: ModuleWithSubmodules) -> Self {
        Self {
            module: tree.module.into(),
            submodules: tree.submodules.into_iter().map(Submodule::from).collect(),
        }
    }
}
