use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::Validation;
use crate::entities::v1::permissions::Action;
use crate::rbac::Grant;
use crate::security::Validator;

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct RoleRequest {
    #[schema(example = "Property Manager")]
    pub name: String,
}

impl RoleRequest {
    pub fn validate(&self) -> Result<(), Validation> {
        let mut validation = Validation::new();
        Validator::required(&mut validation, "name", "Name", &self.name, 255);
        validation.into_result()
    }
}

/// Actions on one submodule, as submitted by the role editor
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct GrantRequest {
    #[schema(example = 1)]
    pub module_id: i32,
    #[schema(example = 1)]
    pub submodule_id: i32,
    #[schema(example = json!(["read", "update"]))]
    pub actions: Vec<String>,
}

/// Full set of grants for a role. Anything omitted is revoked.
#[derive(Clone, Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RolePermissionsRequest {
    #[serde(default)]
    pub permissions: Vec<GrantRequest>,
}

impl RolePermissionsRequest {
    /// Parse action names. Unknown names are reported as
    /// `permissions.{i}.actions.{j}`.
    pub fn into_grants(self) -> Result<Vec<Grant>, Validation> {
        let mut validation = Validation::new();
        let mut grants = Vec::with_capacity(self.permissions.len());

        for (index, grant) in self.permissions.into_iter().enumerate() {
            let mut actions = Vec::with_capacity(grant.actions.len());

            for (position, name) in grant.actions.iter().enumerate() {
                match Action::parse(name.trim()) {
                    Some(action) => actions.push(action),
                    None => validation.add(
                        format!("permissions.{index}.actions.{position}"),
                        format!("Unknown action '{name}'"),
                    ),
                }
            }

            grants.push(Grant {
                module_id: grant.module_id,
                submodule_id: grant.submodule_id,
                actions,
            });
        }

        validation.into_result().map(|()| grants)
    }
}
