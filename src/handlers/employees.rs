use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::repositories::EmployeeRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::payroll::PayrollGroup;
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeQuery {
    pub location_id: Uuid,
    pub payroll_group: Option<PayrollGroup>,
}

/// Active roster for a location, with compensation profiles, as the entry
/// screen needs it.
pub async fn get_employees(
    claims: Claims,
    repo: web::Data<EmployeeRepository>,
    query: web::Query<EmployeeQuery>,
) -> Result<HttpResponse, AppError> {
    if !claims.can_review() && !claims.has_location(query.location_id) {
        return Err(AppError::Forbidden(
            "Not assigned to this location".to_string(),
        ));
    }

    let employees = repo
        .list_active(query.location_id, query.payroll_group)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(employees)))
}
