use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use crate::store::StoreError;
use crate::types::EmployeeId;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Bearer token was malformed, expired, or signed with the wrong key
    #[error("Invalid bearer token")]
    InvalidToken,

    /// Login credentials did not match an account; cause is never surfaced
    #[error("Login failed")]
    AuthenticationFailed,

    /// Token verified but the account behind it is gone
    #[error("Principal not found for subject {email}")]
    PrincipalNotFound { email: String },

    /// Protected route reached without a principal attached
    #[error("Not authenticated")]
    Unauthenticated,

    /// Actor's role does not permit the attempted action
    #[error("{message}")]
    Unauthorized { message: String },

    /// Action targeted the protected superadmin account
    #[error("{message}")]
    SuperAdminProtected { message: String },

    /// Requested employee does not exist
    #[error("{message}")]
    NotFound { message: String },

    /// Email uniqueness violation surfaced from the store
    #[error("An account with this email already exists")]
    DuplicateEmail,

    /// Request body failed validation; `errors` maps field name to message
    #[error("{message}")]
    Validation {
        message: String,
        errors: BTreeMap<String, String>,
    },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Structured error body returned to clients for every failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl Error {
    pub fn unauthorized() -> Self {
        Error::Unauthorized {
            message: "You do not have permission to access this resource".to_string(),
        }
    }

    pub fn employee_not_found(id: EmployeeId) -> Self {
        Error::NotFound {
            message: format!("Employee not found with id: {id}"),
        }
    }

    pub fn employee_not_found_by_email(email: &str) -> Self {
        Error::NotFound {
            message: format!("Employee not found with email: {email}"),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidToken | Error::AuthenticationFailed | Error::PrincipalNotFound { .. } | Error::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            Error::Unauthorized { .. } | Error::SuperAdminProtected { .. } => StatusCode::FORBIDDEN,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::Internal { .. } | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details.
    ///
    /// Token failures and a vanished principal are deliberately indistinguishable to
    /// the client, and login failures never reveal whether the email exists.
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidToken | Error::PrincipalNotFound { .. } => "Authentication failed".to_string(),
            Error::AuthenticationFailed => "Invalid email or password".to_string(),
            Error::Unauthenticated => "Authentication is required".to_string(),
            Error::Unauthorized { message } | Error::SuperAdminProtected { message } => message.clone(),
            Error::NotFound { message } => message.clone(),
            Error::DuplicateEmail => "An account with this email already exists".to_string(),
            Error::Validation { message, .. } => message.clone(),
            Error::Internal { .. } | Error::Other(_) => "An unexpected error occurred".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Internal { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Unauthorized { .. } | Error::SuperAdminProtected { .. } | Error::DuplicateEmail => {
                tracing::warn!("Denied request: {}", self);
            }
            Error::InvalidToken
            | Error::AuthenticationFailed
            | Error::PrincipalNotFound { .. }
            | Error::Unauthenticated
            | Error::NotFound { .. }
            | Error::Validation { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let errors = match &self {
            Error::Validation { errors, .. } if !errors.is_empty() => Some(errors.clone()),
            _ => None,
        };

        let body = ErrorBody {
            status: status.as_u16(),
            message: self.user_message(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            errors,
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => Error::DuplicateEmail,
            StoreError::NotFound => Error::NotFound {
                message: "Employee not found".to_string(),
            },
            StoreError::Database(e) => Error::Internal {
                operation: format!("query employee store: {e}"),
            },
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors: BTreeMap<String, String> = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                errs.first().map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {field}"));
                    (field.to_string(), message)
                })
            })
            .collect();

        let message = field_errors
            .values()
            .next()
            .cloned()
            .unwrap_or_else(|| "Validation failed".to_string());

        Error::Validation {
            message,
            errors: field_errors,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_failures_share_one_client_message() {
        let invalid = Error::InvalidToken;
        let gone = Error::PrincipalNotFound {
            email: "ghost@example.com".to_string(),
        };

        assert_eq!(invalid.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(gone.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(invalid.user_message(), gone.user_message());
    }

    #[test]
    fn test_internal_errors_do_not_leak_details() {
        let err = Error::Internal {
            operation: "connect to postgres at 10.0.0.3".to_string(),
        };

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "An unexpected error occurred");
    }

    #[test]
    fn test_not_found_helpers_format_the_subject() {
        assert_eq!(Error::employee_not_found(42).user_message(), "Employee not found with id: 42");
        assert_eq!(
            Error::employee_not_found_by_email("a@b.com").user_message(),
            "Employee not found with email: a@b.com"
        );
    }

    #[test]
    fn test_store_errors_map_to_http_statuses() {
        assert_eq!(Error::from(StoreError::DuplicateEmail).status_code(), StatusCode::CONFLICT);
        assert_eq!(Error::from(StoreError::NotFound).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::from(StoreError::Database(sqlx::Error::PoolClosed)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
