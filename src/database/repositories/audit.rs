use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{ApprovalAudit, ApprovalAuditInput};
use crate::database::utils::sql;

const AUDIT_COLUMNS: &str =
    "id, submission_id, action, actor_id, prior_status, note, created_at";

#[derive(Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append-only; there is deliberately no update or delete here.
    pub async fn append(&self, input: &ApprovalAuditInput) -> Result<ApprovalAudit> {
        let audit = sqlx::query_as::<_, ApprovalAudit>(&sql(&format!(
            r#"
            INSERT INTO
                approval_audits (submission_id, action, actor_id, prior_status, note)
            VALUES
                (?, ?, ?, ?, ?)
            RETURNING
                {AUDIT_COLUMNS}
            "#
        )))
        .bind(input.submission_id)
        .bind(input.action)
        .bind(input.actor_id)
        .bind(input.prior_status)
        .bind(&input.note)
        .fetch_one(&self.pool)
        .await?;

        Ok(audit)
    }

    pub async fn list_for_submission(&self, submission_id: Uuid) -> Result<Vec<ApprovalAudit>> {
        let audits = sqlx::query_as::<_, ApprovalAudit>(&format!(
            "SELECT {AUDIT_COLUMNS} FROM approval_audits WHERE submission_id = $1 ORDER BY created_at"
        ))
        .bind(submission_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(audits)
    }
}
