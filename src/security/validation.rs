use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::Validation;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("email pattern compiles")
});

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("username pattern compiles"));

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ()-]{6,20}$").expect("phone pattern compiles"));

static LETTER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]").expect("letter pattern compiles"));

static DIGIT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]").expect("digit pattern compiles"));

/// Field format checks shared by request bodies
pub struct Validator;

impl Validator {
    pub fn validate_email(email: &str) -> bool {
        if email.is_empty() || email.len() > 255 || email.contains("..") {
            return false;
        }

        EMAIL_REGEX.is_match(email)
    }

    /// 3 to 64 characters of letters, digits, `_`, `.` or `-`
    pub fn validate_username(username: &str) -> bool {
        (3..=64).contains(&username.len()) && USERNAME_REGEX.is_match(username)
    }

    pub fn validate_phone(phone: &str) -> bool {
        PHONE_REGEX.is_match(phone)
    }

    /// 8 to 128 characters with at least one letter and one digit.
    pub fn validate_password(password: &str) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if password.len() < 8 {
            errors.push("Password must be at least 8 characters long".to_string());
        }
        if password.len() > 128 {
            errors.push("Password must not exceed 128 characters".to_string());
        }
        if !LETTER_REGEX.is_match(password) {
            errors.push("Password must contain at least one letter".to_string());
        }
        if !DIGIT_REGEX.is_match(password) {
            errors.push("Password must contain at least one digit".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Adds "{label} is required" or a length message for `value` to `validation`.
    pub fn required(
        validation: &mut Validation,
        field: &str,
        label: &str,
        value: &str,
        max: usize,
    ) {
        if value.trim().is_empty() {
            validation.add(field, format!("{label} is required"));
        } else if value.chars().count() > max {
            validation.add(
                field,
                format!("{label} may not be greater than {max} characters"),
            );
        }
    }
}
