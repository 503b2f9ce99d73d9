//! Credential and token resolution against the directory store.

use tracing::instrument;

use crate::auth::{password, token};
use crate::errors::{Error, Result};
use crate::store::{Employee, EmployeeStore};

use super::principal::Principal;

/// Check a login attempt and return the matching employee record.
///
/// Fails with the same `AuthenticationFailed` whether the email is unknown
/// or the password wrong, so responses never reveal which part was bad.
#[instrument(skip_all, fields(email = %email))]
pub async fn authenticate(store: &dyn EmployeeStore, email: &str, password: &str) -> Result<Employee> {
    let Some(employee) = store.find_by_email(email).await? else {
        return Err(Error::AuthenticationFailed);
    };

    // Argon2 verification is CPU-bound; keep it off the async runtime
    let password = password.to_string();
    let hash = employee.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(Error::AuthenticationFailed);
    }

    Ok(employee)
}

/// Resolve a bearer token to a live principal.
///
/// The token is verified first; the subject is then looked up fresh so a
/// deleted account cannot keep acting on an old token. Both failure modes
/// reach the client as the same 401.
#[instrument(skip_all)]
pub async fn resolve_from_token(store: &dyn EmployeeStore, secret: &str, bearer_token: &str) -> Result<Principal> {
    let email = token::verify_token(bearer_token, secret)?;

    let Some(employee) = store.find_by_email(&email).await? else {
        return Err(Error::PrincipalNotFound { email });
    };

    Ok(Principal::from(employee))
}
