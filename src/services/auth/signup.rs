use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AuthService;
use crate::models::auth::requests::{AdminSignupRequest, non_blank};
use crate::models::users::requests::NewAdmin;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::password::hash_password_blocking;
use crate::utils::validate::validate_email;

pub async fn handle_admin_signup(
    service: &AuthService,
    signup_request: AdminSignupRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (Some(name), Some(email), Some(department), Some(_)) = (
        non_blank(&signup_request.name),
        non_blank(&signup_request.email),
        non_blank(&signup_request.department),
        non_blank(&signup_request.password),
    ) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "All fields are required",
        )));
    };

    let email = email.to_lowercase();
    if let Err(msg) = validate_email(&email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    let storage = service.get_storage(request);

    match storage.get_admin_by_email(&email).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Admin with this email already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            error!("Failed to check admin email {}: {}", email, e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Server error",
            )));
        }
    }

    // 密码按原样哈希，不做裁剪
    let password = signup_request.password.clone().unwrap_or_default();
    let password_hash = match hash_password_blocking(password).await {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash admin password: {}", e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserCreationFailed,
                "Server error",
            )));
        }
    };

    let new_admin = NewAdmin {
        name: name.to_string(),
        email,
        department: department.to_string(),
        password_hash,
    };

    match storage.create_admin(new_admin).await {
        Ok(admin) => {
            info!("Admin {} registered", admin.id);
            Ok(HttpResponse::Created().json(ApiResponse::success_empty(
                "Admin registered successfully",
            )))
        }
        // 并发注册同一邮箱
        Err(e) if e.is_conflict() => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Admin with this email already exists",
            ),
        )),
        Err(e) => {
            error!("Failed to create admin: {}", e);
            Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserCreationFailed,
                "Server error",
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use std::sync::Arc;

    use crate::services::test_support::{body_json, request_with};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::memory_storage;

    fn signup(email: &str) -> AdminSignupRequest {
        AdminSignupRequest {
            name: Some("Meera Iyer".into()),
            email: Some(email.into()),
            department: Some("CSE".into()),
            password: Some("Secret#2026".into()),
        }
    }

    #[tokio::test]
    async fn test_duplicate_admin_email_rejected() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let request = request_with(&storage, None);
        let service = AuthService::new_lazy();

        let first = handle_admin_signup(&service, signup("meera@campusflow.in"), &request)
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);
        assert_eq!(body_json(first).await["message"], "Admin registered successfully");

        // 邮箱大小写不同也视为同一账号
        let second = handle_admin_signup(&service, signup("Meera@CampusFlow.in"), &request)
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        let body = body_json(second).await;
        assert_eq!(body["message"], "Admin with this email already exists");
        assert_eq!(body["code"], ErrorCode::UserAlreadyExists as i32);
    }

    #[tokio::test]
    async fn test_blank_fields_rejected() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let request = request_with(&storage, None);

        let mut body = signup("meera@campusflow.in");
        body.department = Some("   ".into());
        let response = handle_admin_signup(&AuthService::new_lazy(), body, &request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "All fields are required");
    }
}
