use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::requests::{AdminSignupRequest, LoginRequest, RoleLoginRequest};
use crate::models::users::entities::UserRole;
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    login_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(login_data.into_inner(), &req).await
}

pub async fn admin_login(
    req: HttpRequest,
    login_data: web::Json<RoleLoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .role_login(UserRole::Admin, login_data.into_inner(), &req)
        .await
}

pub async fn teacher_login(
    req: HttpRequest,
    login_data: web::Json<RoleLoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .role_login(UserRole::Teacher, login_data.into_inner(), &req)
        .await
}

pub async fn admin_signup(
    req: HttpRequest,
    signup_data: web::Json<AdminSignupRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.admin_signup(signup_data.into_inner(), &req).await
}

pub async fn admin_profile(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.admin_profile(&request).await
}

pub async fn me(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.me(&request).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/login")
            .wrap(middlewares::RateLimit::login())
            .route(web::post().to(login)),
    )
    .service(
        web::scope("/api/auth")
            .wrap(middlewares::RequireJWT)
            .route("/me", web::get().to(me)),
    );
}
