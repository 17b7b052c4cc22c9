use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source tag stamped on payments materialized by the posting sequence.
pub const PAYMENT_SOURCE: &str = "payroll";

/// Immutable payment record created at posting time. Carries a denormalized
/// snapshot of the employee and submission so it stays correct even if those
/// rows later change.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub employee_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub pay_date: NaiveDate,
    pub amount: BigDecimal,
    pub hours: Option<BigDecimal>,
    pub units: Option<BigDecimal>,
    pub pay_count: Option<i32>,
    pub adjustment: Option<BigDecimal>,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PaymentInput {
    pub submission_id: Uuid,
    pub employee_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub pay_date: NaiveDate,
    pub amount: BigDecimal,
    pub hours: Option<BigDecimal>,
    pub units: Option<BigDecimal>,
    pub pay_count: Option<i32>,
    pub adjustment: Option<BigDecimal>,
}
