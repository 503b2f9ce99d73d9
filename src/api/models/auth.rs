//! API request/response models for registration and login.
//!
//! The field validators reproduce the account rules verbatim: names are words
//! of letters, emails fit the storage column, passwords mix character classes.
//! Each validator reports the first rule a value breaks, so a blank field says
//! "mandatory" rather than also complaining about length and format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::store::{Employee, Role};
use crate::types::EmployeeId;

/// Upper bound on email length, matching the employees table column.
const EMAIL_MAX_CHARS: usize = 100;

fn validate_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("name_mandatory").with_message("Name is mandatory".into()));
    }
    let length = value.chars().count();
    if !(3..=30).contains(&length) {
        return Err(ValidationError::new("name_length")
            .with_message("Name must be between 3 and 30 characters".into()));
    }
    if !is_alphabetic_words(value) {
        return Err(ValidationError::new("name_characters").with_message(
            "Name can only contain alphabetic characters and spaces in between".into(),
        ));
    }
    Ok(())
}

/// Words of ASCII letters separated by single spaces, no leading or trailing
/// space.
fn is_alphabetic_words(value: &str) -> bool {
    value
        .split(' ')
        .all(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic()))
}

fn validate_account_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("email_mandatory").with_message("Email is mandatory".into()));
    }
    // Length before format: an overlong address should say so even when the
    // address itself is well formed.
    if value.chars().count() > EMAIL_MAX_CHARS {
        return Err(ValidationError::new("email_length")
            .with_message("Email must be less than 100 characters long".into()));
    }
    if !value.validate_email() {
        return Err(ValidationError::new("email_format")
            .with_message("Email format should be valid".into()));
    }
    Ok(())
}

fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("password_mandatory")
            .with_message("Password is mandatory".into()));
    }
    if value.chars().count() < 8 {
        return Err(ValidationError::new("password_length")
            .with_message("Password must be at least 8 characters long".into()));
    }
    if !has_required_character_classes(value) {
        return Err(ValidationError::new("password_characters").with_message(
            "Password must contain at least one uppercase letter, one lowercase letter, and one digit"
                .into(),
        ));
    }
    Ok(())
}

fn has_required_character_classes(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
}

/// Payload for `POST /api/v1/auth/register`.
///
/// Also accepted by `PUT /api/v1/employees/updateMyInfo`, which replaces the
/// caller's profile with the same validated shape.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_account_email"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

/// Payload for `POST /api/v1/auth/login`.
///
/// Login applies the same email and password rules as registration, so values
/// that could never have been registered are rejected before any lookup.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_account_email"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

/// Successful login: the employee profile plus a fresh bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub token: String,
    /// Token lifetime in seconds.
    pub token_expires_in: i64,
}

impl LoginResponse {
    pub fn new(employee: Employee, token: String, token_expires_in: i64) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            email: employee.email,
            role: employee.role,
            created_at: employee.created_at,
            token,
            token_expires_in,
        }
    }
}
