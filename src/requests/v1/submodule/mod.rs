use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::Validation;
use crate::security::Validator;

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct SubmoduleRequest {
    #[schema(example = 1)]
    pub module_id: i32,
    #[schema(example = "Property Types")]
    pub title: String,
    /// Admin UI route
    #[schema(example = "/admin/property-types")]
    pub path: Option<String>,
}

impl SubmoduleRequest {
    pub fn validate(&self) -> Result<(), Validation> {
        let mut validation = Validation::new();
        Validator::required(&mut validation, "title", "Title", &self.title, 255);

        if self.path.as_ref().is_some_and(|path| path.chars().count() > 255) {
            validation.add("path", "Path may not be greater than 255 characters");
        }

        validation.into_result()
    }
}
