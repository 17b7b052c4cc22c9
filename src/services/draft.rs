use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{SubmissionInput, SubmissionStatus};
use crate::database::repositories::{BatchWrite, EmployeeRepository, SubmissionRepository};
use crate::error::AppError;
use crate::payroll::{period_for_pay_date, price_entries};

/// What the UI needs back from an auto-save: the row it is editing and the
/// last-saved timestamp for feedback.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftReceipt {
    pub submission_id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub total_amount: BigDecimal,
    pub employee_count: i32,
}

#[derive(Clone)]
pub struct DraftService {
    employees: EmployeeRepository,
    submissions: SubmissionRepository,
}

impl DraftService {
    pub fn new(employees: EmployeeRepository, submissions: SubmissionRepository) -> Self {
        Self {
            employees,
            submissions,
        }
    }

    /// Persists in-progress edits for a batch key. Idempotent: saving the
    /// same entries twice leaves the same state, so the caller's debounce
    /// may fire redundantly without harm. Debouncing itself is the caller's
    /// job.
    ///
    /// Returns `None` when no entry has data — an empty burst of edits must
    /// not create or clear a draft.
    pub async fn save_draft(
        &self,
        input: &SubmissionInput,
        saved_by: Uuid,
    ) -> Result<Option<DraftReceipt>, AppError> {
        let period = period_for_pay_date(input.pay_date);

        let roster = self
            .employees
            .list_active(input.location_id, Some(input.payroll_group))
            .await?;
        let priced = price_entries(&roster, &input.entries);
        if priced.is_empty() {
            return Ok(None);
        }

        let total_amount = priced
            .iter()
            .fold(BigDecimal::zero(), |acc, line| acc + &line.amount);

        let submission = self
            .submissions
            .write_batch(&BatchWrite {
                location_id: input.location_id,
                pay_date: input.pay_date,
                payroll_group: input.payroll_group,
                period_start: period.period_start,
                period_end: period.period_end,
                target: SubmissionStatus::Draft,
                total_amount,
                entries: &priced,
                actor: saved_by,
            })
            .await?;

        Ok(Some(DraftReceipt {
            submission_id: submission.id,
            saved_at: submission.last_saved_at.unwrap_or(submission.updated_at),
            total_amount: submission.total_amount,
            employee_count: submission.employee_count,
        }))
    }
}
