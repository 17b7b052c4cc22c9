use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use crate::payroll::PayrollGroup;

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum CompensationType {
        Hourly => "hourly",
        Production => "production",
        Fixed => "fixed",
    }
}

/// An employee as seen by the payroll engine. The compensation profile is
/// immutable for the lifetime of a submission; archival is a soft delete so
/// posted history keeps resolving.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub location_id: Uuid,
    pub name: String,
    pub payroll_group: PayrollGroup,
    pub compensation_type: CompensationType,
    pub hourly_rate: Option<BigDecimal>,
    pub piece_rate: Option<BigDecimal>,
    pub fixed_pay: Option<BigDecimal>,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub location_id: Uuid,
    pub name: String,
    pub payroll_group: PayrollGroup,
    pub compensation_type: CompensationType,
    pub hourly_rate: Option<BigDecimal>,
    pub piece_rate: Option<BigDecimal>,
    pub fixed_pay: Option<BigDecimal>,
}

// PayrollGroup lives in the pure payroll module; the storage mapping for it
// belongs here with the rest of the column codecs.
impl sqlx::Type<sqlx::Postgres> for PayrollGroup {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("VARCHAR")
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for PayrollGroup {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PayrollGroup {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        s.parse().map_err(Into::into)
    }
}
