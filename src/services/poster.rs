use chrono::Utc;
use uuid::Uuid;

use crate::database::models::{
    AuditAction, PaymentInput, PayrollSubmission, SubmissionStatus,
};
use crate::database::repositories::{
    EmployeeRepository, LocationRepository, PaymentRepository, SubmissionRepository,
};
use crate::error::AppError;
use crate::services::audit_logger::AuditLogger;

/// Executes the ordered posting sequence on approval, and the single-step
/// rejection sibling.
///
/// The sequence is a saga, not a transaction: each step is the unit of
/// retry. Payments are only created after the submission is visibly
/// approved, so a crash in between leaves an "approved but not posted" row
/// that a re-driven approve resumes — skipping payment creation when rows
/// already exist — instead of silently losing the approval or double-paying.
#[derive(Clone)]
pub struct PostingService {
    submissions: SubmissionRepository,
    employees: EmployeeRepository,
    locations: LocationRepository,
    payments: PaymentRepository,
    audit_logger: AuditLogger,
}

impl PostingService {
    pub fn new(
        submissions: SubmissionRepository,
        employees: EmployeeRepository,
        locations: LocationRepository,
        payments: PaymentRepository,
        audit_logger: AuditLogger,
    ) -> Self {
        Self {
            submissions,
            employees,
            locations,
            payments,
            audit_logger,
        }
    }

    pub async fn approve(
        &self,
        submission_id: Uuid,
        approver: Uuid,
    ) -> Result<PayrollSubmission, AppError> {
        let submission = self
            .submissions
            .find_by_id(submission_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Submission {} not found", submission_id)))?;

        match submission.status {
            SubmissionStatus::Pending | SubmissionStatus::Approved => {}
            SubmissionStatus::Posted => {
                return Err(AppError::Conflict(format!(
                    "Submission {} is already posted",
                    submission_id
                )));
            }
            SubmissionStatus::Draft | SubmissionStatus::Rejected => {
                return Err(AppError::Conflict(format!(
                    "Submission {} is not pending review",
                    submission_id
                )));
            }
        }

        let now = Utc::now();

        // Steps 1-3: pending -> approved, mirror onto entries, leave the
        // audit record. The guarded update returns None when the submission
        // is no longer pending: either a rejection won the race (conflict)
        // or an earlier drive already got this far (resume).
        let approved = match self
            .submissions
            .mark_approved(submission_id, approver, now)
            .await?
        {
            Some(approved) => {
                self.submissions
                    .set_entries_status(submission_id, SubmissionStatus::Approved, now)
                    .await?;

                // Audit is a nicety, not a correctness requirement; never
                // abort the sequence over it.
                if let Err(err) = self
                    .audit_logger
                    .record(
                        submission_id,
                        AuditAction::Approved,
                        approver,
                        SubmissionStatus::Pending,
                        None,
                    )
                    .await
                {
                    log::warn!(
                        "audit append failed for submission {} (step 3): {}",
                        submission_id,
                        err
                    );
                }

                approved
            }
            None => {
                let current = self.submissions.find_by_id(submission_id).await?.ok_or_else(
                    || AppError::NotFound(format!("Submission {} not found", submission_id)),
                )?;
                if current.status != SubmissionStatus::Approved {
                    return Err(AppError::Conflict(format!(
                        "Submission {} is no longer pending",
                        submission_id
                    )));
                }
                log::info!(
                    "resuming posting for already-approved submission {}",
                    submission_id
                );
                current
            }
        };

        // Step 4: materialize payments, unless an earlier drive already did.
        if self.payments.count_for_submission(submission_id).await? == 0 {
            let rows = self.build_payment_rows(&approved).await?;
            let inserted = self.payments.insert_payments(&rows).await?;
            log::info!(
                "created {} payments for submission {}",
                inserted,
                submission_id
            );
        } else {
            log::info!(
                "payments already exist for submission {}; skipping creation (step 4)",
                submission_id
            );
        }

        // Steps 5-6: approved -> posted, mirror onto entries.
        let posted = self
            .submissions
            .mark_posted(submission_id, approver, now)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!(
                    "Submission {} left the approved state mid-posting",
                    submission_id
                ))
            })?;
        self.submissions
            .set_entries_status(submission_id, SubmissionStatus::Posted, now)
            .await?;

        Ok(posted)
    }

    pub async fn reject(
        &self,
        submission_id: Uuid,
        rejector: Uuid,
        note: &str,
    ) -> Result<PayrollSubmission, AppError> {
        let note = note.trim();
        if note.is_empty() {
            return Err(AppError::Validation(
                "A rejection note is required".to_string(),
            ));
        }

        self.submissions
            .find_by_id(submission_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Submission {} not found", submission_id)))?;

        let now = Utc::now();
        let rejected = self
            .submissions
            .mark_rejected(submission_id, rejector, note, now)
            .await?
            .ok_or_else(|| {
                AppError::Conflict(format!(
                    "Submission {} is not pending review",
                    submission_id
                ))
            })?;

        self.submissions
            .set_entries_status(submission_id, SubmissionStatus::Rejected, now)
            .await?;

        if let Err(err) = self
            .audit_logger
            .record(
                submission_id,
                AuditAction::Rejected,
                rejector,
                SubmissionStatus::Pending,
                Some(note.to_string()),
            )
            .await
        {
            log::warn!(
                "audit append failed for submission {} (rejection): {}",
                submission_id,
                err
            );
        }

        Ok(rejected)
    }

    /// Builds the denormalized payment snapshot for every stored entry.
    /// Archived employees still resolve by id so late approvals post
    /// correctly.
    async fn build_payment_rows(
        &self,
        submission: &PayrollSubmission,
    ) -> Result<Vec<PaymentInput>, AppError> {
        let location = self
            .locations
            .find_by_id(submission.location_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Location {} not found", submission.location_id))
            })?;

        let entries = self.submissions.entries_for(submission.id).await?;

        let mut rows = Vec::with_capacity(entries.len());
        for entry in &entries {
            let employee = self
                .employees
                .find_by_id(entry.employee_id)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!("Employee {} not found", entry.employee_id))
                })?;
            let (first_name, last_name) = split_name(&employee.name);

            rows.push(PaymentInput {
                submission_id: submission.id,
                employee_id: employee.id,
                first_name,
                last_name,
                department: location.name.clone(),
                pay_date: submission.pay_date,
                amount: entry.amount.clone(),
                hours: entry.hours.clone(),
                units: entry.units.clone(),
                pay_count: entry.pay_count,
                adjustment: entry.adjustment.clone(),
            });
        }

        Ok(rows)
    }
}

/// Splits a display name into first/last for the payment snapshot.
/// Everything after the first space belongs to the last name.
fn split_name(name: &str) -> (String, String) {
    match name.trim().split_once(' ') {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (name.trim().to_string(), String::new()),
    }
}
