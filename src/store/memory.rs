//! In-memory directory store for single-process deployments and tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use super::errors::StoreError;
use super::models::{Employee, EmployeeFilter, EmployeeUpdate, NewEmployee, Role, SortOrder};
use super::EmployeeStore;
use crate::types::EmployeeId;

/// Internal state for the memory-based store.
#[derive(Debug)]
struct InnerState {
    /// Records keyed by id.
    employees: BTreeMap<EmployeeId, Employee>,
    /// Next id to assign, monotonically increasing.
    next_id: EmployeeId,
}

/// In-memory employee store behind a Tokio RwLock.
///
/// Holds nothing across restarts. Suitable for single-node deployments
/// without a configured database, and for the test suite.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<InnerState>>,
}

impl Default for InnerState {
    fn default() -> Self {
        Self {
            employees: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn create(&self, new_employee: NewEmployee) -> Result<Employee, StoreError> {
        let mut state = self.state.write().await;

        if state.employees.values().any(|e| e.email == new_employee.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let id = state.next_id;
        state.next_id += 1;

        let employee = Employee {
            id,
            name: new_employee.name,
            email: new_employee.email,
            password_hash: new_employee.password_hash,
            role: new_employee.role,
            created_at: Utc::now(),
        };
        state.employees.insert(id, employee.clone());

        info!(id, email = %employee.email, role = ?employee.role, "Employee created");
        Ok(employee)
    }

    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError> {
        let state = self.state.read().await;
        Ok(state.employees.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError> {
        let state = self.state.read().await;
        Ok(state.employees.values().find(|e| e.email == email).cloned())
    }

    async fn update(&self, id: EmployeeId, update: EmployeeUpdate) -> Result<Employee, StoreError> {
        let mut state = self.state.write().await;

        if state.employees.values().any(|e| e.id != id && e.email == update.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let employee = state.employees.get_mut(&id).ok_or(StoreError::NotFound)?;
        employee.name = update.name;
        employee.email = update.email;
        employee.password_hash = update.password_hash;

        Ok(employee.clone())
    }

    async fn set_role(&self, id: EmployeeId, role: Role) -> Result<Employee, StoreError> {
        let mut state = self.state.write().await;

        let employee = state.employees.get_mut(&id).ok_or(StoreError::NotFound)?;
        employee.role = role;

        info!(id, role = ?role, "Employee role changed");
        Ok(employee.clone())
    }

    async fn delete(&self, id: EmployeeId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;

        if state.employees.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }

        info!(id, "Employee deleted");
        Ok(())
    }

    async fn list(&self, filter: &EmployeeFilter, order: SortOrder, limit: i64, offset: i64) -> Result<Vec<Employee>, StoreError> {
        let state = self.state.read().await;

        let mut matching: Vec<Employee> = state.employees.values().filter(|e| filter.matches(e)).cloned().collect();

        // Creation time with id as tie-break keeps page boundaries stable
        matching.sort_by(|a, b| match order {
            SortOrder::Asc => a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
            SortOrder::Desc => b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)),
        });

        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok(page)
    }

    async fn count(&self, filter: &EmployeeFilter) -> Result<i64, StoreError> {
        let state = self.state.read().await;
        Ok(state.employees.values().filter(|e| filter.matches(e)).count() as i64)
    }
}
