//! Directory store: pluggable persistence for employee records.
//!
//! Two implementations exist behind the [`EmployeeStore`] trait:
//! - [`MemoryStore`]: in-process map, used when no `database_url` is
//!   configured and throughout the test suite
//! - [`PgStore`]: Postgres via sqlx, schema ensured at startup
//!
//! The store is a transactional collaborator: it guarantees per-record
//! atomicity and email uniqueness, nothing more. No retries happen here;
//! transient failures propagate to the caller as [`StoreError::Database`].

pub mod errors;
pub mod memory;
pub mod models;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

pub use errors::StoreError;
pub use memory::MemoryStore;
pub use models::{Employee, EmployeeFilter, EmployeeUpdate, NewEmployee, Role, SortOrder};
pub use postgres::PgStore;

use crate::types::EmployeeId;

/// Shared handle to whichever store implementation the process runs with.
pub type DynEmployeeStore = Arc<dyn EmployeeStore>;

/// Persistence operations for employee records.
///
/// Implementations must be safe for concurrent use; every method is a
/// single atomic step from the caller's perspective.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Insert a new record and return it with its assigned id and
    /// creation timestamp. Fails with [`StoreError::DuplicateEmail`] if
    /// the email is taken.
    async fn create(&self, new_employee: NewEmployee) -> Result<Employee, StoreError>;

    /// Look up a record by id.
    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError>;

    /// Look up a record by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError>;

    /// Replace name, email, and password hash of an existing record.
    /// Fails with [`StoreError::DuplicateEmail`] if the new email belongs
    /// to another record.
    async fn update(&self, id: EmployeeId, update: EmployeeUpdate) -> Result<Employee, StoreError>;

    /// Set the role of an existing record.
    async fn set_role(&self, id: EmployeeId, role: Role) -> Result<Employee, StoreError>;

    /// Delete a record. Fails with [`StoreError::NotFound`] if absent.
    async fn delete(&self, id: EmployeeId) -> Result<(), StoreError>;

    /// Fetch one page of records matching `filter`, ordered by creation
    /// time in `order` direction.
    async fn list(&self, filter: &EmployeeFilter, order: SortOrder, limit: i64, offset: i64) -> Result<Vec<Employee>, StoreError>;

    /// Count all records matching `filter`, ignoring pagination.
    async fn count(&self, filter: &EmployeeFilter) -> Result<i64, StoreError>;
}
