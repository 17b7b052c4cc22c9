use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entry::EntryInput;
use super::macros::string_enum;
use crate::payroll::PayrollGroup;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum SubmissionStatus {
        Draft => "draft",
        Pending => "pending",
        Approved => "approved",
        Posted => "posted",
        Rejected => "rejected",
    }
}

impl SubmissionStatus {
    /// Open statuses participate in the one-open-submission-per-key invariant.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::Draft | SubmissionStatus::Pending | SubmissionStatus::Rejected
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStatus::Posted)
    }
}

/// One location's payroll batch for one pay date and payroll group.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PayrollSubmission {
    pub id: Uuid,
    pub location_id: Uuid,
    pub pay_date: NaiveDate,
    pub payroll_group: PayrollGroup,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub status: SubmissionStatus,
    pub total_amount: BigDecimal,
    pub employee_count: i32,
    pub submitted_by: Option<Uuid>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub processed_by: Option<Uuid>,
    pub processed_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_note: Option<String>,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body shared by the auto-save and submit endpoints: the batch key
/// plus the entered lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    pub location_id: Uuid,
    pub pay_date: NaiveDate,
    pub payroll_group: PayrollGroup,
    pub entries: Vec<EntryInput>,
}

#[cfg(test)]
mod tests {
    use super::SubmissionStatus;

    #[test]
    fn only_draft_pending_and_rejected_are_open() {
        assert!(SubmissionStatus::Draft.is_open());
        assert!(SubmissionStatus::Pending.is_open());
        assert!(SubmissionStatus::Rejected.is_open());
        assert!(!SubmissionStatus::Approved.is_open());
        assert!(!SubmissionStatus::Posted.is_open());
    }

    #[test]
    fn posted_is_the_only_terminal_status() {
        assert!(SubmissionStatus::Posted.is_terminal());
        assert!(!SubmissionStatus::Rejected.is_terminal());
        assert!(!SubmissionStatus::Approved.is_terminal());
    }

    #[test]
    fn status_round_trips_through_its_storage_form() {
        for status in [
            SubmissionStatus::Draft,
            SubmissionStatus::Pending,
            SubmissionStatus::Approved,
            SubmissionStatus::Posted,
            SubmissionStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<SubmissionStatus>(), Ok(status));
        }
    }
}
