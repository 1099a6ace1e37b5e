use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult, is_unique_violation, violated_constraint};
use crate::model::employee::{Employee, NewEmployee};
use crate::repository::{EmployeeRepository, USER_ALREADY_LINKED};

/// Postgres' default name for the `UNIQUE` on `employees.user_id`.
const USER_LINK_CONSTRAINT: &str = "employees_user_id_key";

const EMPLOYEE_COLUMNS: &str =
    "id, employee_id, first_name, last_name, email, department, user_id";

pub struct PgEmployeeRepository {
    pool: PgPool,
}

impl PgEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> AppResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE {column} = $1");
        debug!(sql = %sql, "Looking up employee");

        sqlx::query_as::<_, Employee>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }
}

#[async_trait]
impl EmployeeRepository for PgEmployeeRepository {
    async fn list(&self) -> AppResult<Vec<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY id DESC");

        sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch employees");
                AppError::from(e)
            })
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1");

        sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, id, "Failed to fetch employee");
                AppError::from(e)
            })
    }

    async fn find_by_code(&self, employee_id: &str) -> AppResult<Option<Employee>> {
        self.find_one("employee_id", employee_id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Employee>> {
        self.find_one("email", &email.to_lowercase()).await
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE user_id = $1");

        sqlx::query_as::<_, Employee>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn create(&self, employee: NewEmployee) -> AppResult<Employee> {
        let sql = format!(
            r#"
            INSERT INTO employees
                (employee_id, first_name, last_name, email, department, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Employee>(&sql)
            .bind(&employee.employee_id)
            .bind(&employee.first_name)
            .bind(&employee.last_name)
            .bind(&employee.email)
            .bind(&employee.department)
            .bind(employee.user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    if violated_constraint(&e) == Some(USER_LINK_CONSTRAINT) {
                        return AppError::conflict(USER_ALREADY_LINKED);
                    }
                    return AppError::conflict("Employee ID or email already exists");
                }
                error!(error = %e, employee_id = %employee.employee_id, "Failed to create employee");
                AppError::from(e)
            })?;

        info!(id = created.id, employee_id = %created.employee_id, "Employee created");
        Ok(created)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, id, "Failed to delete employee");
                AppError::from(e)
            })?;

        debug!(id, rows = result.rows_affected(), "Employee delete executed");
        Ok(())
    }
}
