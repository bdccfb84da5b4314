use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::error::ErrorKind;
use tracing::debug;

use crate::error::ApiError;
use crate::model::employee::Employee;

const DUPLICATE_MSG: &str = "Employee name must be unique within department";
const NOT_FOUND_MSG: &str = "Employee not found";

/// Fields supplied by the caller on insert; id and timestamps are assigned
/// by the repository.
#[derive(Debug)]
pub struct NewEmployee {
    pub name: String,
    pub department: String,
    pub salary: f64,
}

#[derive(Debug, Default)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub is_active: Option<bool>,
    pub sort_by: Option<String>,
}

/// Single seam for all reads and writes of employee rows. Enforces the
/// active-only uniqueness rule on (name, department) before every insert and
/// update, and implements delete as an update flipping `is_active`.
#[derive(Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Active rows only; soft-deleted employees read as absent.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Employee>, ApiError> {
        let employee =
            sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ? AND is_active = 1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(employee)
    }

    pub async fn get_all(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>, ApiError> {
        let mut conditions = Vec::new();
        if filter.department.is_some() {
            conditions.push("department = ?");
        }
        if filter.is_active.is_some() {
            conditions.push("is_active = ?");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let order_clause = match filter
            .sort_by
            .as_deref()
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("name") => "ORDER BY name ASC",
            Some("salary") => "ORDER BY salary ASC",
            _ => "ORDER BY id ASC",
        };

        let sql = format!("SELECT * FROM employees {} {}", where_clause, order_clause);
        debug!(sql = %sql, "listing employees");

        let mut query = sqlx::query_as::<_, Employee>(&sql);
        if let Some(department) = &filter.department {
            query = query.bind(department);
        }
        if let Some(is_active) = filter.is_active {
            query = query.bind(is_active);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    pub async fn add(&self, new: NewEmployee) -> Result<Employee, ApiError> {
        if self.exists(&new.name, &new.department).await? {
            return Err(ApiError::Conflict(DUPLICATE_MSG.to_string()));
        }

        let created_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO employees (name, department, salary, is_active, created_at)
            VALUES (?, ?, ?, 1, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.department)
        .bind(new.salary)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(Employee {
            id: result.last_insert_rowid(),
            name: new.name,
            department: new.department,
            salary: new.salary,
            is_active: true,
            created_at,
            updated_at: None,
        })
    }

    /// Persists all mutable fields and stamps `updated_at`. Fails with
    /// Conflict when another active row already holds (name, department).
    pub async fn update(&self, employee: &Employee) -> Result<Employee, ApiError> {
        let duplicate = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM employees
                WHERE id != ? AND name = ? AND department = ? AND is_active = 1
            )
            "#,
        )
        .bind(employee.id)
        .bind(&employee.name)
        .bind(&employee.department)
        .fetch_one(&self.pool)
        .await?;

        if duplicate {
            return Err(ApiError::Conflict(DUPLICATE_MSG.to_string()));
        }

        let updated_at = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET name = ?, department = ?, salary = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&employee.name)
        .bind(&employee.department)
        .bind(employee.salary)
        .bind(employee.is_active)
        .bind(updated_at)
        .bind(employee.id)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(NOT_FOUND_MSG.to_string()));
        }

        let mut updated = employee.clone();
        updated.updated_at = Some(updated_at);
        Ok(updated)
    }

    /// Flips `is_active` and routes through `update`; the row is never
    /// removed from storage.
    pub async fn soft_delete(&self, id: i64) -> Result<(), ApiError> {
        let mut employee = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(NOT_FOUND_MSG.to_string()))?;

        employee.is_active = false;
        self.update(&employee).await?;
        Ok(())
    }

    pub async fn exists(&self, name: &str, department: &str) -> Result<bool, ApiError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM employees
                WHERE name = ? AND department = ? AND is_active = 1
            )
            "#,
        )
        .bind(name)
        .bind(department)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Mean salary over active rows; `None` when the department has no
    /// active employees.
    pub async fn average_salary(&self, department: &str) -> Result<Option<f64>, ApiError> {
        let average = sqlx::query_scalar::<_, Option<f64>>(
            "SELECT AVG(salary) FROM employees WHERE department = ? AND is_active = 1",
        )
        .bind(department)
        .fetch_one(&self.pool)
        .await?;
        Ok(average)
    }
}

/// The partial unique index can still fire when two writers race past the
/// application-side check; both signals are the same Conflict to callers.
fn map_unique_violation(e: sqlx::Error) -> ApiError {
    match &e {
        sqlx::Error::Database(db) if matches!(db.kind(), ErrorKind::UniqueViolation) => {
            ApiError::Conflict(DUPLICATE_MSG.to_string())
        }
        _ => ApiError::Database(e),
    }
}
