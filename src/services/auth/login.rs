use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AuthService;
use crate::models::auth::requests::{LoginRequest, RoleLoginRequest, non_blank};
use crate::models::auth::responses::{
    AdminLoginResponse, LoginResponse, LoginUser, TeacherLoginResponse,
};
use crate::models::users::entities::{Account, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

/// 校验凭据的结果
enum LoginOutcome {
    Success(Account, String),
    InvalidCredentials,
    Failed(HttpResponse),
}

fn invalid_credentials() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::InvalidCredentials,
        "Invalid credentials",
    ))
}

// 查找账号、校验密码并签发令牌
async fn authenticate(
    service: &AuthService,
    request: &HttpRequest,
    role: UserRole,
    email: &str,
    password: &str,
) -> LoginOutcome {
    let storage = service.get_storage(request);
    let email = email.to_lowercase();

    let account = match storage.get_account_by_email(role, &email).await {
        Ok(Some(account)) => account,
        Ok(None) => return LoginOutcome::InvalidCredentials,
        Err(e) => {
            error!("Login lookup failed for {} {}: {}", role, email, e);
            return LoginOutcome::Failed(HttpResponse::InternalServerError().json(
                ApiResponse::error_empty(ErrorCode::InternalServerError, "Server error"),
            ));
        }
    };

    if !verify_password(password, account.password_hash()) {
        return LoginOutcome::InvalidCredentials;
    }

    if let Account::Admin(ref admin) = account
        && let Err(e) = storage.update_admin_last_login(admin.id).await
    {
        error!("Failed to update last login for admin {}: {}", admin.id, e);
    }

    match JwtUtils::generate_access_token(account.id(), role) {
        Ok(token) => {
            info!("{} {} logged in", role, account.id());
            LoginOutcome::Success(account, token)
        }
        Err(e) => {
            error!("Failed to generate JWT token: {}", e);
            LoginOutcome::Failed(HttpResponse::InternalServerError().json(
                ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                ),
            ))
        }
    }
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (Some(email), Some(password), Some(role)) = (
        non_blank(&login_request.email),
        login_request.password.as_deref().filter(|p| !p.is_empty()),
        non_blank(&login_request.role),
    ) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Email, password, and role are required",
        )));
    };

    let Ok(role) = role.to_lowercase().parse::<UserRole>() else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidRole,
            "Invalid role specified",
        )));
    };

    match authenticate(service, request, role, email, password).await {
        LoginOutcome::Success(account, token) => {
            let response = LoginResponse {
                token,
                user: LoginUser::from(&account),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
        }
        LoginOutcome::InvalidCredentials => Ok(invalid_credentials()),
        LoginOutcome::Failed(response) => Ok(response),
    }
}

pub async fn handle_role_login(
    service: &AuthService,
    role: UserRole,
    login_request: RoleLoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (Some(email), Some(password)) = (
        non_blank(&login_request.email),
        login_request.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Email and password are required",
        )));
    };

    match authenticate(service, request, role, email, password).await {
        LoginOutcome::Success(Account::Admin(admin), token) => {
            let response = AdminLoginResponse { token, admin };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
        }
        LoginOutcome::Success(Account::Teacher(teacher), token) => {
            let response = TeacherLoginResponse { token, teacher };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
        }
        LoginOutcome::Success(account, token) => {
            let response = LoginResponse {
                token,
                user: LoginUser::from(&account),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
        }
        LoginOutcome::InvalidCredentials => Ok(invalid_credentials()),
        LoginOutcome::Failed(response) => Ok(response),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use std::sync::Arc;

    use crate::models::users::requests::NewAdmin;
    use crate::services::test_support::{body_json, request_with};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::memory_storage;
    use crate::utils::password::hash_password;

    async fn storage_with_admin() -> Arc<dyn Storage> {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        storage
            .create_admin(NewAdmin {
                name: "Meera Iyer".into(),
                email: "meera@campusflow.in".into(),
                department: "CSE".into(),
                password_hash: hash_password("Secret#2026").unwrap(),
            })
            .await
            .unwrap();
        storage
    }

    fn login(email: &str, password: &str, role: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
            role: Some(role.into()),
        }
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let storage = storage_with_admin().await;
        let request = request_with(&storage, None);

        let response = handle_login(
            &AuthService::new_lazy(),
            login("meera@campusflow.in", "wrong-password", "admin"),
            &request,
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid credentials");
        assert_eq!(body["code"], ErrorCode::InvalidCredentials as i32);
    }

    #[tokio::test]
    async fn test_unknown_email_rejected_like_wrong_password() {
        let storage = storage_with_admin().await;
        let request = request_with(&storage, None);

        let response = handle_login(
            &AuthService::new_lazy(),
            login("nobody@campusflow.in", "Secret#2026", "admin"),
            &request,
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_unknown_role_rejected() {
        let storage = storage_with_admin().await;
        let request = request_with(&storage, None);

        let response = handle_login(
            &AuthService::new_lazy(),
            login("meera@campusflow.in", "Secret#2026", "principal"),
            &request,
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid role specified");
        assert_eq!(body["code"], ErrorCode::InvalidRole as i32);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let storage = storage_with_admin().await;
        let request = request_with(&storage, None);

        let response = handle_login(&AuthService::new_lazy(), LoginRequest::default(), &request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "Email, password, and role are required"
        );
    }
}
