use actix_web::{HttpResponse, web};

use crate::database::models::SubmissionInput;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;
use crate::services::draft::{DraftReceipt, DraftService};

/// Auto-save endpoint. The UI debounces bursts of edits into one call; the
/// save itself is idempotent so a redundant call is only wasted I/O. The
/// client treats failures as best-effort and retries on its next debounce
/// cycle.
pub async fn save_draft(
    claims: Claims,
    drafts: web::Data<DraftService>,
    input: web::Json<SubmissionInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();

    if !claims.can_submit() {
        return Err(AppError::Forbidden(
            "Only submitters may save payroll drafts".to_string(),
        ));
    }
    if !claims.has_location(input.location_id) {
        return Err(AppError::Forbidden(
            "Not assigned to this location".to_string(),
        ));
    }

    match drafts.save_draft(&input, claims.user_id()).await? {
        Some(receipt) => Ok(HttpResponse::Ok().json(ApiResponse::success(receipt))),
        None => Ok(HttpResponse::Ok().json(ApiResponse::<DraftReceipt>::success_with_message(
            None,
            "No entries with data; draft not saved",
        ))),
    }
}
