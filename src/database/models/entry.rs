use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::submission::SubmissionStatus;

/// One employee's line item within a submission. Exactly one measure group is
/// populated, matching the employee's compensation type: hours (hourly),
/// units (production), or pay_count + adjustment (fixed).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionEntry {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub employee_id: Uuid,
    pub hours: Option<BigDecimal>,
    pub units: Option<BigDecimal>,
    pub pay_count: Option<i32>,
    pub adjustment: Option<BigDecimal>,
    pub amount: BigDecimal,
    pub notes: Option<String>,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryInput {
    pub employee_id: Uuid,
    pub hours: Option<BigDecimal>,
    pub units: Option<BigDecimal>,
    pub pay_count: Option<i32>,
    pub adjustment: Option<BigDecimal>,
    pub notes: Option<String>,
}
