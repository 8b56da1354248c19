use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::AuthService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};

pub async fn handle_admin_profile(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(admin_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized",
        )));
    };

    let storage = service.get_storage(request);
    match storage.get_admin_by_id(admin_id).await {
        Ok(Some(admin)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            admin,
            "Admin profile retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "Admin not found",
        ))),
        Err(e) => {
            error!("Failed to load admin profile {}: {}", admin_id, e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Server error",
            )))
        }
    }
}

pub async fn handle_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_user(request) {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(user, "OK"))),
        None => Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized",
        ))),
    }
}
