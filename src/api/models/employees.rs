//! API request/response models for the employee directory.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::store::{Employee, EmployeeFilter, Role, SortOrder};
use crate::types::EmployeeId;

/// Default number of employees per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum number of employees that can be requested per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Employee profile as returned by the API.
///
/// This is the only shape an employee record is rendered through; the password
/// hash never leaves the store layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            email: employee.email,
            role: employee.role,
            created_at: employee.created_at,
        }
    }
}

/// One page of the directory listing plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePageResponse {
    pub employees: Vec<EmployeeResponse>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
}

impl EmployeePageResponse {
    /// Assemble a page response, deriving `total_pages` from the item count.
    pub fn new(
        employees: Vec<EmployeeResponse>,
        current_page: i64,
        page_size: i64,
        total_items: i64,
    ) -> Self {
        Self {
            employees,
            current_page,
            total_pages: (total_items + page_size - 1) / page_size,
            total_items,
        }
    }
}

/// Query parameters for `GET /api/v1/employees/list`.
///
/// Page numbers are zero based. Out-of-range `page` and `size` values are
/// clamped rather than rejected, so a sloppy client gets a sensible page
/// instead of an error.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListEmployeesQuery {
    /// Zero-based page number (default: 0)
    #[param(default = 0, minimum = 0)]
    pub page: Option<i64>,

    /// Page size (default: 10, max: 100)
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub size: Option<i64>,

    /// Sort direction for the join date: `asc` or `desc` (default: `desc`)
    pub order_by_date: Option<String>,

    /// Keep only employees with this role
    pub role: Option<Role>,

    /// Keep only employees who joined on or before this date (inclusive)
    pub date_joined_before: Option<NaiveDate>,

    /// Keep only employees who joined strictly after this date
    pub date_joined_after: Option<NaiveDate>,
}

impl ListEmployeesQuery {
    /// Requested page number, defaulting to 0 and never negative.
    #[inline]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(0).max(0)
    }

    /// Requested page size, clamped between 1 and [`MAX_PAGE_SIZE`].
    /// Defaults to [`DEFAULT_PAGE_SIZE`] if not specified.
    #[inline]
    pub fn size(&self) -> i64 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Sort order for the join date. Anything but `asc` means newest first.
    pub fn order(&self) -> SortOrder {
        match &self.order_by_date {
            Some(value) if value.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    /// Role and join-date restrictions for the store layer.
    pub fn filter(&self) -> EmployeeFilter {
        EmployeeFilter {
            role: self.role,
            joined_before: self.date_joined_before,
            joined_after: self.date_joined_after,
        }
    }
}
