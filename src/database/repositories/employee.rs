use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Employee, EmployeeInput};
use crate::database::utils::sql;
use crate::payroll::PayrollGroup;

const EMPLOYEE_COLUMNS: &str = "id, location_id, name, payroll_group, compensation_type, \
     hourly_rate, piece_rate, fixed_pay, archived_at, created_at, updated_at";

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_employee(&self, input: &EmployeeInput) -> Result<Employee> {
        let employee = sqlx::query_as::<_, Employee>(&sql(&format!(
            r#"
            INSERT INTO
                employees (location_id, name, payroll_group, compensation_type,
                           hourly_rate, piece_rate, fixed_pay)
            VALUES
                (?, ?, ?, ?, ?, ?, ?)
            RETURNING
                {EMPLOYEE_COLUMNS}
            "#
        )))
        .bind(input.location_id)
        .bind(&input.name)
        .bind(input.payroll_group)
        .bind(input.compensation_type)
        .bind(&input.hourly_rate)
        .bind(&input.piece_rate)
        .bind(&input.fixed_pay)
        .fetch_one(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Active roster for a location, optionally narrowed to one payroll group.
    pub async fn list_active(
        &self,
        location_id: Uuid,
        payroll_group: Option<PayrollGroup>,
    ) -> Result<Vec<Employee>> {
        let employees = if let Some(group) = payroll_group {
            sqlx::query_as::<_, Employee>(&format!(
                "SELECT {EMPLOYEE_COLUMNS} FROM employees \
                 WHERE location_id = $1 AND payroll_group = $2 AND archived_at IS NULL \
                 ORDER BY name"
            ))
            .bind(location_id)
            .bind(group)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Employee>(&format!(
                "SELECT {EMPLOYEE_COLUMNS} FROM employees \
                 WHERE location_id = $1 AND archived_at IS NULL \
                 ORDER BY name"
            ))
            .bind(location_id)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(employees)
    }

    /// Soft delete; posted history keeps resolving through the id.
    pub async fn archive(&self, id: Uuid) -> Result<Option<Employee>> {
        let now = Utc::now();
        let employee = sqlx::query_as::<_, Employee>(&format!(
            "UPDATE employees SET archived_at = $1, updated_at = $1 \
             WHERE id = $2 AND archived_at IS NULL \
             RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }
}
