//! The authenticated identity attached to a request.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::errors::{Error, Result};
use crate::store::{Employee, Role};
use crate::types::EmployeeId;

/// Principal resolved from a verified bearer token.
///
/// Carries only what authorization decisions need; the password hash never
/// leaves the store layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: EmployeeId,
    pub email: String,
    pub role: Role,
}

impl From<Employee> for Principal {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            email: employee.email,
            role: employee.role,
        }
    }
}

/// Extracts the principal the authentication gate attached to the request.
///
/// The gate is permissive about missing credentials, so protected handlers
/// rely on this extractor to reject anonymous access.
impl FromRequestParts<AppState> for Principal {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self> {
        parts.extensions.get::<Principal>().cloned().ok_or(Error::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_principal_drops_the_password_hash() {
        let employee = Employee {
            id: 7,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
        };

        let principal = Principal::from(employee);
        let json = serde_json::to_value(&principal).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["role"], "ADMIN");
        // Only what authorization needs survives the conversion.
        assert!(json.get("password_hash").is_none());
        assert!(json.get("name").is_none());
    }
}
