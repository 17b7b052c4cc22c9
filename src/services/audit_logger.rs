use anyhow::Result;
use uuid::Uuid;

use crate::database::models::{ApprovalAuditInput, AuditAction, SubmissionStatus};
use crate::database::repositories::AuditRepository;

/// Thin wrapper around the append-only approval audit trail.
#[derive(Clone)]
pub struct AuditLogger {
    repository: AuditRepository,
}

impl AuditLogger {
    pub fn new(repository: AuditRepository) -> Self {
        Self { repository }
    }

    pub async fn record(
        &self,
        submission_id: Uuid,
        action: AuditAction,
        actor_id: Uuid,
        prior_status: SubmissionStatus,
        note: Option<String>,
    ) -> Result<()> {
        self.repository
            .append(&ApprovalAuditInput {
                submission_id,
                action,
                actor_id,
                prior_status,
                note,
            })
            .await?;

        Ok(())
    }
}
