//! Directory store records and query types.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::types::EmployeeId;

/// Employee role, ordered `User < Admin < SuperAdmin` for display purposes
/// only. Authorization rules are not a pure hierarchy; see `auth::policy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "employee_role", rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

/// A persisted employee record. Never serialized directly; API responses
/// strip the password hash.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a new employee record.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Fields replaced by a self-service profile update. All three are always
/// written; partial updates are not part of the API surface.
#[derive(Debug, Clone)]
pub struct EmployeeUpdate {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Sort direction for listing by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Listing filter. Both date bounds compare against the record's creation
/// timestamp at midnight UTC of the given date: `joined_before` is
/// inclusive (`created_at <= bound`) while `joined_after` is strict
/// (`created_at > bound`). Clients depend on that exact asymmetry; both
/// store implementations must preserve it.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub role: Option<Role>,
    pub joined_before: Option<NaiveDate>,
    pub joined_after: Option<NaiveDate>,
}

impl EmployeeFilter {
    /// Upper bound as a timestamp, midnight UTC of `joined_before`.
    pub fn before_bound(&self) -> Option<DateTime<Utc>> {
        self.joined_before.map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// Lower bound as a timestamp, midnight UTC of `joined_after`.
    pub fn after_bound(&self) -> Option<DateTime<Utc>> {
        self.joined_after.map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }

    /// Whether `employee` satisfies every set predicate.
    pub fn matches(&self, employee: &Employee) -> bool {
        if let Some(role) = self.role {
            if employee.role != role {
                return false;
            }
        }
        if let Some(before) = self.before_bound() {
            if employee.created_at > before {
                return false;
            }
        }
        if let Some(after) = self.after_bound() {
            if employee.created_at <= after {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn employee_created_at(created_at: DateTime<Utc>) -> Employee {
        Employee {
            id: 1,
            name: "Test Employee".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
            created_at,
        }
    }

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), "\"SUPERADMIN\"");
        assert_eq!(serde_json::from_str::<Role>("\"SUPERADMIN\"").unwrap(), Role::SuperAdmin);
    }

    #[test]
    fn joined_after_is_strict_and_joined_before_is_inclusive() {
        // The lower bound excludes the boundary instant while the upper
        // bound includes it. Intentional, do not symmetrize.
        let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let at_midnight = employee_created_at(midnight);
        let after_filter = EmployeeFilter {
            joined_after: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            ..Default::default()
        };
        let before_filter = EmployeeFilter {
            joined_before: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            ..Default::default()
        };

        // created_at == bound: excluded by `after`, included by `before`
        assert!(!after_filter.matches(&at_midnight));
        assert!(before_filter.matches(&at_midnight));

        // One second past midnight: included by `after`, excluded by `before`
        let just_after = employee_created_at(midnight + chrono::Duration::seconds(1));
        assert!(after_filter.matches(&just_after));
        assert!(!before_filter.matches(&just_after));
    }

    #[test]
    fn role_filter_matches_exact_role() {
        let mut employee = employee_created_at(Utc::now());
        employee.role = Role::Admin;

        let filter = EmployeeFilter {
            role: Some(Role::Admin),
            ..Default::default()
        };
        assert!(filter.matches(&employee));

        let filter = EmployeeFilter {
            role: Some(Role::User),
            ..Default::default()
        };
        assert!(!filter.matches(&employee));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let employee = employee_created_at(Utc::now());
        assert!(EmployeeFilter::default().matches(&employee));
    }
}
