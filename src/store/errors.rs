use thiserror::Error as ThisError;

/// Failures surfaced by a directory store implementation.
///
/// Constraint violations are lifted into dedicated variants so callers can
/// map them to client-facing responses without inspecting driver errors.
#[derive(ThisError, Debug)]
pub enum StoreError {
    /// Another record already holds this email address
    #[error("an employee with this email already exists")]
    DuplicateEmail,

    /// The targeted record does not exist
    #[error("employee not found")]
    NotFound,

    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
