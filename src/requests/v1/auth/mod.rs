use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::Validation;
use crate::requests::v1::user::new_password;

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Email or username
    #[schema(example = "admin")]
    pub identifier: String,
    #[schema(example = "password")]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), Validation> {
        let mut validation = Validation::new();

        if self.identifier.trim().is_empty() {
            validation.add("identifier", "Email or username is required");
        }
        if self.password.is_empty() {
            validation.add("password", "Password is required");
        }

        validation.into_result()
    }
}

/// Redeems a reset token issued by an administrator
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct PasswordResetRequest {
    #[schema(example = "0b7c5e1f2d3a4b5c8d9e0f1a2b3c4d5e")]
    pub token: String,
    #[schema(example = "Secret2025")]
    pub password: String,
    #[schema(example = "Secret2025")]
    pub password_confirmation: String,
}

impl PasswordResetRequest {
    pub fn validate(&self) -> Result<(), Validation> {
        let mut validation = Validation::new();

        if self.token.trim().is_empty() {
            validation.add("token", "Reset token is required");
        }
        new_password(
            &mut validation,
            "password",
            &self.password,
            &self.password_confirmation,
        );

        validation.into_result()
    }
}
