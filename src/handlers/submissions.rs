use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{
    ApprovalAudit, PayrollSubmission, SubmissionEntry, SubmissionInput, SubmissionStatus,
};
use crate::database::repositories::{AuditRepository, SubmissionRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;
use crate::services::poster::PostingService;
use crate::services::submission::SubmissionService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionQuery {
    pub location_id: Option<Uuid>,
    pub status: Option<String>,
    pub pay_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct RejectionRequest {
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDetail {
    #[serde(flatten)]
    pub submission: PayrollSubmission,
    pub entries: Vec<SubmissionEntry>,
}

/// Explicit submit: moves the batch to pending review.
pub async fn submit(
    claims: Claims,
    service: web::Data<SubmissionService>,
    input: web::Json<SubmissionInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();

    if !claims.can_submit() {
        return Err(AppError::Forbidden(
            "Only submitters may submit payroll batches".to_string(),
        ));
    }
    if !claims.has_location(input.location_id) {
        return Err(AppError::Forbidden(
            "Not assigned to this location".to_string(),
        ));
    }

    let submission = service.submit(&input, claims.user_id()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(submission)))
}

pub async fn get_submissions(
    claims: Claims,
    repo: web::Data<SubmissionRepository>,
    query: web::Query<SubmissionQuery>,
) -> Result<HttpResponse, AppError> {
    let status = match &query.status {
        Some(raw) => Some(
            raw.parse::<SubmissionStatus>()
                .map_err(|_| AppError::Validation(format!("Invalid status: {}", raw)))?,
        ),
        None => None,
    };

    // Reviewers see every location; submitters only their assignments.
    let location_filter: Option<Vec<Uuid>> = if claims.can_review() {
        query.location_id.map(|id| vec![id])
    } else {
        match query.location_id {
            Some(id) if claims.has_location(id) => Some(vec![id]),
            Some(_) => {
                return Err(AppError::Forbidden(
                    "Not assigned to this location".to_string(),
                ));
            }
            None => Some(claims.location_ids.clone()),
        }
    };

    let submissions = repo
        .get_submissions(location_filter.as_deref(), status, query.pay_date)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(submissions)))
}

pub async fn get_submission(
    claims: Claims,
    repo: web::Data<SubmissionRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let submission_id = path.into_inner();

    let submission = repo
        .find_by_id(submission_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Submission {} not found", submission_id)))?;

    if !claims.can_review() && !claims.has_location(submission.location_id) {
        return Err(AppError::Forbidden(
            "Cannot view submissions for other locations".to_string(),
        ));
    }

    let entries = repo.entries_for(submission_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(SubmissionDetail {
        submission,
        entries,
    })))
}

pub async fn get_audit_trail(
    claims: Claims,
    repo: web::Data<SubmissionRepository>,
    audits: web::Data<AuditRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let submission_id = path.into_inner();

    let submission = repo
        .find_by_id(submission_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Submission {} not found", submission_id)))?;

    if !claims.can_review() && !claims.has_location(submission.location_id) {
        return Err(AppError::Forbidden(
            "Cannot view submissions for other locations".to_string(),
        ));
    }

    let trail: Vec<ApprovalAudit> = audits.list_for_submission(submission_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(trail)))
}

/// Approves a pending submission and drives the posting sequence through to
/// `posted`. Safe to re-run after a partial failure.
pub async fn approve_submission(
    claims: Claims,
    poster: web::Data<PostingService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    if !claims.can_review() {
        return Err(AppError::Forbidden(
            "Insufficient permissions to approve submissions".to_string(),
        ));
    }

    let submission = poster.approve(path.into_inner(), claims.user_id()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(submission)))
}

pub async fn reject_submission(
    claims: Claims,
    poster: web::Data<PostingService>,
    path: web::Path<Uuid>,
    body: web::Json<RejectionRequest>,
) -> Result<HttpResponse, AppError> {
    if !claims.can_review() {
        return Err(AppError::Forbidden(
            "Insufficient permissions to reject submissions".to_string(),
        ));
    }

    let note = body.note.clone().unwrap_or_default();
    let submission = poster
        .reject(path.into_inner(), claims.user_id(), &note)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(submission)))
}
