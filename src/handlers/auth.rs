use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::database::models::{LoginInput, UserInfo};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::auth::Claims;

pub async fn login(
    app_state: web::Data<AppState>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
    match app_state.auth_service.login(input.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(err) => {
            log::warn!("Login failed: {}", err);
            Err(AppError::Unauthorized)
        }
    }
}

pub async fn me(
    claims: Claims,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    match app_state.auth_service.current_user(&claims).await? {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(UserInfo::from(user)))),
        None => Err(AppError::NotFound("User not found".to_string())),
    }
}
