use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::repositories::{PaymentRepository, SubmissionRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuery {
    pub submission_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Historical payment reads. Payments are immutable snapshots; this endpoint
/// never participates in the posting sequence itself.
pub async fn get_payments(
    claims: Claims,
    payments: web::Data<PaymentRepository>,
    submissions: web::Data<SubmissionRepository>,
    query: web::Query<PaymentQuery>,
) -> Result<HttpResponse, AppError> {
    if let Some(submission_id) = query.submission_id {
        let submission = submissions.find_by_id(submission_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Submission {} not found", submission_id))
        })?;
        if !claims.can_review() && !claims.has_location(submission.location_id) {
            return Err(AppError::Forbidden(
                "Cannot view payments for other locations".to_string(),
            ));
        }

        let rows = payments.list_for_submission(submission_id).await?;
        return Ok(HttpResponse::Ok().json(ApiResponse::success(rows)));
    }

    match query.location_id {
        Some(location_id) => {
            if !claims.can_review() && !claims.has_location(location_id) {
                return Err(AppError::Forbidden(
                    "Cannot view payments for other locations".to_string(),
                ));
            }
        }
        None => {
            if !claims.can_review() {
                return Err(AppError::Forbidden(
                    "A location filter is required".to_string(),
                ));
            }
        }
    }

    let rows = payments
        .get_payments(query.location_id, query.from, query.to)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(rows)))
}
