use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::Validation;
use crate::security::Validator;

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct UserStoreRequest {
    #[schema(example = "Jane Agent")]
    pub name: String,
    #[schema(example = "jane.agent")]
    pub username: String,
    #[schema(example = "jane@realestate.local")]
    pub email: String,
    #[schema(example = "+62 812-3456-7890")]
    pub phone: Option<String>,
    #[schema(example = "Secret2025")]
    pub password: String,
    #[schema(example = "Secret2025")]
    pub password_confirmation: String,
    #[schema(example = 2)]
    pub role_id: i32,
}

impl UserStoreRequest {
    pub fn validate(&self) -> Result<(), Validation> {
        let mut validation = Validation::new();

        general_information(
            &mut validation,
            &self.name,
            &self.username,
            &self.email,
            self.phone.as_deref(),
        );
        new_password(
            &mut validation,
            "password",
            &self.password,
            &self.password_confirmation,
        );

        validation.into_result()
    }
}

/// Name, username, email and phone of an existing user
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct UserUpdateGeneralInformationRequest {
    #[schema(example = "Jane Agent")]
    pub name: String,
    #[schema(example = "jane.agent")]
    pub username: String,
    #[schema(example = "jane@realestate.local")]
    pub email: String,
    /// Blank or absent clears the phone
    #[schema(example = "+62 812-3456-7890")]
    pub phone: Option<String>,
}

impl UserUpdateGeneralInformationRequest {
    pub fn validate(&self) -> Result<(), Validation> {
        let mut validation = Validation::new();

        general_information(
            &mut validation,
            &self.name,
            &self.username,
            &self.email,
            self.phone.as_deref(),
        );

        validation.into_result()
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct UserUpdatePasswordRequest {
    #[schema(example = "password")]
    pub current_password: String,
    #[schema(example = "Secret2025")]
    pub new_password: String,
    #[schema(example = "Secret2025")]
    pub password_confirmation: String,
}

impl UserUpdatePasswordRequest {
    pub fn validate(&self) -> Result<(), Validation> {
        let mut validation = Validation::new();

        if self.current_password.is_empty() {
            validation.add("current_password", "Current password is required");
        }
        new_password(
            &mut validation,
            "new_password",
            &self.new_password,
            &self.password_confirmation,
        );

        validation.into_result()
    }
}

fn general_information(
    validation: &mut Validation,
    name: &str,
    username: &str,
    email: &str,
    phone: Option<&str>,
) {
    Validator::required(validation, "name", "Name", name, 255);

    if !Validator::validate_username(username.trim()) {
        validation.add(
            "username",
            "Username must be 3 to 64 letters, digits, dots, dashes or underscores",
        );
    }

    if !Validator::validate_email(email.trim()) {
        validation.add("email", "Email is invalid");
    }

    if let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) {
        if !Validator::validate_phone(phone) {
            validation.add("phone", "Phone is invalid");
        }
    }
}

/// Password rules on `field` plus a matching `password_confirmation`.
pub(crate) fn new_password(
    validation: &mut Validation,
    field: &str,
    password: &str,
    confirmation: &str,
) {
    if let Err(errors) = Validator::validate_password(password) {
        for error in errors {
            validation.add(field, error);
        }
    }

    if password != confirmation {
        validation.add("password_confirmation", "Password confirmation does not match");
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct UserRoleRequest {
    #[schema(example = 2)]
    pub role_id: i32,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserPaginationRequest {
    /// 1-based
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Matches name, username or email
    pub search: Option<String>,
}

impl UserPaginationRequest {
    pub const MAX_PER_PAGE: u64 = 100;

    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u64 {
        self.per_page.unwrap_or(15).clamp(1, Self::MAX_PER_PAGE)
    }

    /// Saturates, so an absurd `page` yields an empty page.
    pub fn offset(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }

    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
    }
}
