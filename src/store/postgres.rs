//! Postgres-backed directory store.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use super::errors::StoreError;
use super::models::{Employee, EmployeeFilter, EmployeeUpdate, NewEmployee, Role, SortOrder};
use super::EmployeeStore;
use crate::types::EmployeeId;

/// The email uniqueness constraint, as named by Postgres for
/// `email TEXT UNIQUE` on the `employees` table.
const EMAIL_CONSTRAINT: &str = "employees_email_key";

const SCHEMA_SQL: &str = "\
DO $$ BEGIN
    CREATE TYPE employee_role AS ENUM ('USER', 'ADMIN', 'SUPERADMIN');
EXCEPTION
    WHEN duplicate_object THEN NULL;
END $$;

CREATE TABLE IF NOT EXISTS employees (
    id            BIGSERIAL PRIMARY KEY,
    name          TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role          employee_role NOT NULL DEFAULT 'USER',
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

/// Employee store backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool. The schema is not touched; call
    /// [`PgStore::ensure_schema`] before first use.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `url` and make sure the schema exists.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the role enum and employees table if they are missing.
    /// Idempotent across restarts and concurrent instances.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        info!("Employee schema ensured");
        Ok(())
    }

    fn map_unique_violation(e: sqlx::Error) -> StoreError {
        match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(EMAIL_CONSTRAINT) => StoreError::DuplicateEmail,
            other => StoreError::Database(other),
        }
    }

    // One parameterized query per direction; NULL binds disable a predicate.
    // joined_before is inclusive, joined_after strict; see EmployeeFilter.
    fn list_query(order: SortOrder) -> &'static str {
        match order {
            SortOrder::Asc => {
                "SELECT * FROM employees \
                 WHERE ($1::employee_role IS NULL OR role = $1) \
                   AND ($2::timestamptz IS NULL OR created_at <= $2) \
                   AND ($3::timestamptz IS NULL OR created_at > $3) \
                 ORDER BY created_at ASC, id ASC LIMIT $4 OFFSET $5"
            }
            SortOrder::Desc => {
                "SELECT * FROM employees \
                 WHERE ($1::employee_role IS NULL OR role = $1) \
                   AND ($2::timestamptz IS NULL OR created_at <= $2) \
                   AND ($3::timestamptz IS NULL OR created_at > $3) \
                 ORDER BY created_at DESC, id DESC LIMIT $4 OFFSET $5"
            }
        }
    }
}

#[async_trait]
impl EmployeeStore for PgStore {
    async fn create(&self, new_employee: NewEmployee) -> Result<Employee, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            "INSERT INTO employees (name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(&new_employee.name)
        .bind(&new_employee.email)
        .bind(&new_employee.password_hash)
        .bind(new_employee.role)
        .fetch_one(&self.pool)
        .await
        .map_err(Self::map_unique_violation)?;

        info!(id = employee.id, email = %employee.email, role = ?employee.role, "Employee created");
        Ok(employee)
    }

    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn update(&self, id: EmployeeId, update: EmployeeUpdate) -> Result<Employee, StoreError> {
        sqlx::query_as::<_, Employee>(
            "UPDATE employees SET name = $2, email = $3, password_hash = $4 \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.email)
        .bind(&update.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(Self::map_unique_violation)?
        .ok_or(StoreError::NotFound)
    }

    async fn set_role(&self, id: EmployeeId, role: Role) -> Result<Employee, StoreError> {
        let employee = sqlx::query_as::<_, Employee>("UPDATE employees SET role = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(role)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;

        info!(id, role = ?role, "Employee role changed");
        Ok(employee)
    }

    async fn delete(&self, id: EmployeeId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1").bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        info!(id, "Employee deleted");
        Ok(())
    }

    async fn list(&self, filter: &EmployeeFilter, order: SortOrder, limit: i64, offset: i64) -> Result<Vec<Employee>, StoreError> {
        let employees = sqlx::query_as::<_, Employee>(Self::list_query(order))
            .bind(filter.role)
            .bind(filter.before_bound())
            .bind(filter.after_bound())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    async fn count(&self, filter: &EmployeeFilter) -> Result<i64, StoreError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM employees \
             WHERE ($1::employee_role IS NULL OR role = $1) \
               AND ($2::timestamptz IS NULL OR created_at <= $2) \
               AND ($3::timestamptz IS NULL OR created_at > $3)",
        )
        .bind(filter.role)
        .bind(filter.before_bound())
        .bind(filter.after_bound())
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_schema_declares_role_enum_and_unique_email() {
        let schema = flat(SCHEMA_SQL);
        assert!(schema.contains("CREATE TYPE employee_role AS ENUM ('USER', 'ADMIN', 'SUPERADMIN')"));
        assert!(schema.contains("CREATE TABLE IF NOT EXISTS employees"));
        // The unique column is what makes map_unique_violation's constraint probe fire.
        assert!(schema.contains("email TEXT NOT NULL UNIQUE"));
    }

    #[test]
    fn test_list_query_orders_by_creation_time_with_id_tiebreak() {
        assert!(PgStore::list_query(SortOrder::Asc).contains("ORDER BY created_at ASC, id ASC"));
        assert!(PgStore::list_query(SortOrder::Desc).contains("ORDER BY created_at DESC, id DESC"));
    }

    #[test]
    fn test_list_query_before_is_inclusive_and_after_is_strict() {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let sql = PgStore::list_query(order);
            assert!(sql.contains("created_at <= $2"));
            assert!(sql.contains("created_at > $3"));
        }
    }
}
