use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{PAYMENT_SOURCE, Payment, PaymentInput};
use crate::database::utils::sql;

const PAYMENT_COLUMNS: &str = "id, submission_id, employee_id, first_name, last_name, \
     department, pay_date, amount, hours, units, pay_count, adjustment, source, created_at";

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether the posting sequence already materialized payments for this
    /// submission. Checked before inserting so a re-driven approval never
    /// duplicates ledger rows.
    pub async fn count_for_submission(&self, submission_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM payments WHERE submission_id = $1",
        )
        .bind(submission_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Inserts one payment per entry. The (submission, employee) uniqueness
    /// constraint backstops the existence check above.
    pub async fn insert_payments(&self, payments: &[PaymentInput]) -> Result<u64> {
        let mut inserted = 0;
        for payment in payments {
            let result = sqlx::query(&sql(
                r#"
                INSERT INTO
                    payments (
                        submission_id,
                        employee_id,
                        first_name,
                        last_name,
                        department,
                        pay_date,
                        amount,
                        hours,
                        units,
                        pay_count,
                        adjustment,
                        source
                    )
                VALUES
                    (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT (submission_id, employee_id) DO NOTHING
                "#,
            ))
            .bind(payment.submission_id)
            .bind(payment.employee_id)
            .bind(&payment.first_name)
            .bind(&payment.last_name)
            .bind(&payment.department)
            .bind(payment.pay_date)
            .bind(&payment.amount)
            .bind(&payment.hours)
            .bind(&payment.units)
            .bind(payment.pay_count)
            .bind(&payment.adjustment)
            .bind(PAYMENT_SOURCE)
            .execute(&self.pool)
            .await?;

            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    pub async fn list_for_submission(&self, submission_id: Uuid) -> Result<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE submission_id = $1 ORDER BY last_name, first_name"
        ))
        .bind(submission_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Historical reads; the location filter goes through the submission row
    /// because payments themselves only carry the denormalized name.
    pub async fn get_payments(
        &self,
        location_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Payment>> {
        let mut query = sqlx::QueryBuilder::<sqlx::Postgres>::new(format!(
            "SELECT {} FROM payments p \
             JOIN payroll_submissions s ON s.id = p.submission_id WHERE 1 = 1",
            prefixed_payment_columns()
        ));

        if let Some(location_id) = location_id {
            query.push(" AND s.location_id = ");
            query.push_bind(location_id);
        }
        if let Some(from) = from {
            query.push(" AND p.pay_date >= ");
            query.push_bind(from);
        }
        if let Some(to) = to {
            query.push(" AND p.pay_date <= ");
            query.push_bind(to);
        }
        query.push(" ORDER BY p.pay_date DESC, p.last_name, p.first_name");

        let payments = query
            .build_query_as::<Payment>()
            .fetch_all(&self.pool)
            .await?;

        Ok(payments)
    }
}

fn prefixed_payment_columns() -> String {
    PAYMENT_COLUMNS
        .split(", ")
        .map(|col| format!("p.{}", col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
