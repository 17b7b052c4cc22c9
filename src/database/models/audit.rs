use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use super::submission::SubmissionStatus;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum AuditAction {
        Approved => "approved",
        Rejected => "rejected",
    }
}

/// Append-only record of a reviewer action. Never updated or deleted;
/// rejection history survives resubmission.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalAudit {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub action: AuditAction,
    pub actor_id: Uuid,
    pub prior_status: SubmissionStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ApprovalAuditInput {
    pub submission_id: Uuid,
    pub action: AuditAction,
    pub actor_id: Uuid,
    pub prior_status: SubmissionStatus,
    pub note: Option<String>,
}
