use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::payroll::period_for_pay_date;
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    pub pay_date: String,
}

/// Derives the payroll group and period bounds for a pay date.
///
/// The date arrives as a string so an unparsable value becomes a validation
/// error here, before any caller goes on to load employees or save drafts
/// against a bogus period.
pub async fn get_periods(
    _claims: Claims,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let pay_date = NaiveDate::parse_from_str(&query.pay_date, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!(
            "Invalid pay date '{}'; expected YYYY-MM-DD",
            query.pay_date
        ))
    })?;

    let period = period_for_pay_date(pay_date);

    Ok(HttpResponse::Ok().json(ApiResponse::success(period)))
}
