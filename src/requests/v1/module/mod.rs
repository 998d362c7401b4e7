use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::Validation;
use crate::security::Validator;

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct ModuleRequest {
    #[schema(example = "Properties Management")]
    pub name: String,
}

impl ModuleRequest {
    pub fn validate(&self) -> Result<(), Validation> {
        let mut validation = Validation::new();
        Validator::required(&mut validation, "name", "Name", &self.name, 255);
        validation.into_result()
    }
}
