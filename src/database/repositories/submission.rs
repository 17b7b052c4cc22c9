use anyhow::Result;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{PayrollSubmission, SubmissionEntry, SubmissionStatus};
use crate::database::utils::sql;
use crate::error::AppError;
use crate::payroll::{PayrollGroup, PricedEntry};

const SUBMISSION_COLUMNS: &str = "id, location_id, pay_date, payroll_group, period_start, \
     period_end, status, total_amount, employee_count, submitted_by, submitted_at, \
     approved_by, approved_at, processed_by, processed_at, rejected_by, rejected_at, \
     rejection_note, last_saved_at, created_at, updated_at";

const ENTRY_COLUMNS: &str = "id, submission_id, employee_id, hours, units, pay_count, \
     adjustment, amount, notes, status, created_at, updated_at";

/// One write of a payroll batch: the key, the derived period, the target
/// status (draft for auto-save, pending for submit) and the priced entries
/// that fully replace whatever was stored before.
pub struct BatchWrite<'a> {
    pub location_id: Uuid,
    pub pay_date: NaiveDate,
    pub payroll_group: PayrollGroup,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub target: SubmissionStatus,
    pub total_amount: BigDecimal,
    pub entries: &'a [PricedEntry],
    pub actor: Uuid,
}

#[derive(Clone)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PayrollSubmission>> {
        let submission = sqlx::query_as::<_, PayrollSubmission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM payroll_submissions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    /// The open (draft/pending/rejected) submission for a batch key, if any.
    pub async fn find_open(
        &self,
        location_id: Uuid,
        pay_date: NaiveDate,
        payroll_group: PayrollGroup,
    ) -> Result<Option<PayrollSubmission>> {
        let submission = sqlx::query_as::<_, PayrollSubmission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM payroll_submissions \
             WHERE location_id = $1 AND pay_date = $2 AND payroll_group = $3 \
               AND status IN ('draft', 'pending', 'rejected')"
        ))
        .bind(location_id)
        .bind(pay_date)
        .bind(payroll_group)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    pub async fn get_submissions(
        &self,
        location_ids: Option<&[Uuid]>,
        status: Option<SubmissionStatus>,
        pay_date: Option<NaiveDate>,
    ) -> Result<Vec<PayrollSubmission>> {
        let mut query = sqlx::QueryBuilder::<sqlx::Postgres>::new(format!(
            "SELECT {SUBMISSION_COLUMNS} FROM payroll_submissions WHERE 1 = 1"
        ));

        if let Some(ids) = location_ids {
            query.push(" AND location_id = ANY(");
            query.push_bind(ids.to_vec());
            query.push(")");
        }
        if let Some(status) = status {
            query.push(" AND status = ");
            query.push_bind(status);
        }
        if let Some(pay_date) = pay_date {
            query.push(" AND pay_date = ");
            query.push_bind(pay_date);
        }
        query.push(" ORDER BY pay_date DESC, created_at DESC");

        let submissions = query
            .build_query_as::<PayrollSubmission>()
            .fetch_all(&self.pool)
            .await?;

        Ok(submissions)
    }

    pub async fn entries_for(&self, submission_id: Uuid) -> Result<Vec<SubmissionEntry>> {
        let entries = sqlx::query_as::<_, SubmissionEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM submission_entries WHERE submission_id = $1 ORDER BY created_at"
        ))
        .bind(submission_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Upserts the open submission for the batch key and fully replaces its
    /// entries, in one transaction.
    ///
    /// Reuses an existing draft/rejected row (clearing the rejection fields)
    /// rather than creating a duplicate; an already-pending row is a
    /// conflict. A concurrent first save for a brand-new key trips the
    /// partial unique index, in which case the lookup is retried once and
    /// finds the winner's row.
    pub async fn write_batch(&self, batch: &BatchWrite<'_>) -> Result<PayrollSubmission, AppError> {
        match self.try_write_batch(batch).await {
            Err(AppError::Database(err)) if is_unique_violation(&err) => {
                log::warn!(
                    "concurrent first save for location {} / {} / group {}; retrying",
                    batch.location_id,
                    batch.pay_date,
                    batch.payroll_group
                );
                self.try_write_batch(batch).await
            }
            result => result,
        }
    }

    async fn try_write_batch(
        &self,
        batch: &BatchWrite<'_>,
    ) -> Result<PayrollSubmission, AppError> {
        let now = Utc::now();
        let employee_count = batch.entries.len() as i32;
        let (submitted_by, submitted_at) = match batch.target {
            SubmissionStatus::Pending => (Some(batch.actor), Some(now)),
            _ => (None, None),
        };

        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, PayrollSubmission>(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM payroll_submissions \
             WHERE location_id = $1 AND pay_date = $2 AND payroll_group = $3 \
               AND status IN ('draft', 'pending', 'rejected') \
             FOR UPDATE"
        ))
        .bind(batch.location_id)
        .bind(batch.pay_date)
        .bind(batch.payroll_group)
        .fetch_optional(&mut *tx)
        .await?;

        let submission = match existing {
            Some(open) => {
                if open.status == SubmissionStatus::Pending {
                    return Err(AppError::Conflict(format!(
                        "Submission {} is already pending review",
                        open.id
                    )));
                }

                sqlx::query_as::<_, PayrollSubmission>(&sql(&format!(
                    r#"
                    UPDATE
                        payroll_submissions
                    SET
                        period_start = ?,
                        period_end = ?,
                        status = ?,
                        total_amount = ?,
                        employee_count = ?,
                        submitted_by = ?,
                        submitted_at = ?,
                        rejected_by = NULL,
                        rejected_at = NULL,
                        rejection_note = NULL,
                        last_saved_at = ?,
                        updated_at = ?
                    WHERE
                        id = ?
                    RETURNING
                        {SUBMISSION_COLUMNS}
                    "#
                )))
                .bind(batch.period_start)
                .bind(batch.period_end)
                .bind(batch.target)
                .bind(&batch.total_amount)
                .bind(employee_count)
                .bind(submitted_by)
                .bind(submitted_at)
                .bind(now)
                .bind(now)
                .bind(open.id)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, PayrollSubmission>(&sql(&format!(
                    r#"
                    INSERT INTO
                        payroll_submissions (
                            location_id,
                            pay_date,
                            payroll_group,
                            period_start,
                            period_end,
                            status,
                            total_amount,
                            employee_count,
                            submitted_by,
                            submitted_at,
                            last_saved_at
                        )
                    VALUES
                        (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    RETURNING
                        {SUBMISSION_COLUMNS}
                    "#
                )))
                .bind(batch.location_id)
                .bind(batch.pay_date)
                .bind(batch.payroll_group)
                .bind(batch.period_start)
                .bind(batch.period_end)
                .bind(batch.target)
                .bind(&batch.total_amount)
                .bind(employee_count)
                .bind(submitted_by)
                .bind(submitted_at)
                .bind(now)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        // Entries are replaced wholesale, never patched, so cleared rows
        // cannot linger.
        sqlx::query("DELETE FROM submission_entries WHERE submission_id = $1")
            .bind(submission.id)
            .execute(&mut *tx)
            .await?;

        for priced in batch.entries {
            sqlx::query(&sql(
                r#"
                INSERT INTO
                    submission_entries (
                        submission_id,
                        employee_id,
                        hours,
                        units,
                        pay_count,
                        adjustment,
                        amount,
                        notes,
                        status
                    )
                VALUES
                    (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            ))
            .bind(submission.id)
            .bind(priced.entry.employee_id)
            .bind(&priced.entry.hours)
            .bind(&priced.entry.units)
            .bind(priced.entry.pay_count)
            .bind(&priced.entry.adjustment)
            .bind(&priced.amount)
            .bind(&priced.entry.notes)
            .bind(batch.target)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(submission)
    }

    /// Step 1 of the posting sequence. Guarded on `pending` so whichever
    /// reviewer action lands first is authoritative; returns `None` when the
    /// submission is no longer pending.
    pub async fn mark_approved(
        &self,
        id: Uuid,
        approved_by: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<PayrollSubmission>> {
        let submission = sqlx::query_as::<_, PayrollSubmission>(&format!(
            "UPDATE payroll_submissions \
             SET status = 'approved', approved_by = $1, approved_at = $2, updated_at = $2 \
             WHERE id = $3 AND status = 'pending' \
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(approved_by)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    /// Final step of the posting sequence; only an approved submission can
    /// become posted.
    pub async fn mark_posted(
        &self,
        id: Uuid,
        processed_by: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<PayrollSubmission>> {
        let submission = sqlx::query_as::<_, PayrollSubmission>(&format!(
            "UPDATE payroll_submissions \
             SET status = 'posted', processed_by = $1, processed_at = $2, updated_at = $2 \
             WHERE id = $3 AND status = 'approved' \
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(processed_by)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    /// Single-step sibling of the posting sequence. Guarded on `pending`;
    /// returns `None` when an approval already won.
    pub async fn mark_rejected(
        &self,
        id: Uuid,
        rejected_by: Uuid,
        note: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PayrollSubmission>> {
        let submission = sqlx::query_as::<_, PayrollSubmission>(&format!(
            "UPDATE payroll_submissions \
             SET status = 'rejected', rejected_by = $1, rejected_at = $2, rejection_note = $3, updated_at = $2 \
             WHERE id = $4 AND status = 'pending' \
             RETURNING {SUBMISSION_COLUMNS}"
        ))
        .bind(rejected_by)
        .bind(now)
        .bind(note)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(submission)
    }

    /// Mirrors the parent submission's status onto its entries.
    pub async fn set_entries_status(
        &self,
        submission_id: Uuid,
        status: SubmissionStatus,
        now: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE submission_entries SET status = $1, updated_at = $2 WHERE submission_id = $3",
        )
        .bind(status)
        .bind(now)
        .bind(submission_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
