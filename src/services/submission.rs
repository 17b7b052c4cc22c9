use bigdecimal::{BigDecimal, Zero};
use uuid::Uuid;

use crate::database::models::{PayrollSubmission, SubmissionInput, SubmissionStatus};
use crate::database::repositories::{BatchWrite, EmployeeRepository, SubmissionRepository};
use crate::error::AppError;
use crate::payroll::{period_for_pay_date, price_entries};

#[derive(Clone)]
pub struct SubmissionService {
    employees: EmployeeRepository,
    submissions: SubmissionRepository,
}

impl SubmissionService {
    pub fn new(employees: EmployeeRepository, submissions: SubmissionRepository) -> Self {
        Self {
            employees,
            submissions,
        }
    }

    /// Explicit submit: draft/rejected (or nothing yet saved) becomes
    /// pending.
    ///
    /// Rows without data — hours outside [0, 80], units ≤ 0, count ≤ 0 — are
    /// silently excluded rather than errored; only an empty result is a
    /// validation failure. Resubmission reuses the open row and clears its
    /// rejection fields; the audit trail is never cleared. A batch already
    /// pending review conflicts.
    pub async fn submit(
        &self,
        input: &SubmissionInput,
        submitted_by: Uuid,
    ) -> Result<PayrollSubmission, AppError> {
        let period = period_for_pay_date(input.pay_date);

        let roster = self
            .employees
            .list_active(input.location_id, Some(input.payroll_group))
            .await?;
        let priced = price_entries(&roster, &input.entries);
        if priced.is_empty() {
            return Err(AppError::Validation(
                "No entries with payable data; nothing to submit".to_string(),
            ));
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
                target: SubmissionStatus::Pending,
                total_amount,
                entries: &priced,
                actor: submitted_by,
            })
            .await?;

        log::info!(
            "submission {} for location {} ({} / group {}) moved to pending with {} entries",
            submission.id,
            submission.location_id,
            submission.pay_date,
            submission.payroll_group,
            submission.employee_count
        );

        Ok(submission)
    }
}
