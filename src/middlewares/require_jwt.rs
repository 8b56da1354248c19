/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>`，按令牌中的角色到对应账号表加载主体，
 * 并以 [`AuthUser`] 的形式写入请求扩展，供后续中间件和处理函数使用。
 *
 * ```rust,ignore
 * web::scope("/api/tasks")
 *     .wrap(RequireRole::new_any(UserRole::teacher_roles()))
 *     .wrap(RequireJWT)
 *     .route("/teacher", web::get().to(list_teacher_tasks))
 * ```
 *
 * 主体信息按 `user:<token>` 缓存 `cache.default_ttl` 秒。
 */

use crate::cache::{CacheResult, ObjectCache, ObjectCacheExt};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{AuthUser, UserRole};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

// 提取并验证令牌，返回请求主体
async fn authenticate(req: &ServiceRequest) -> Result<AuthUser, String> {
    let token = bearer_token(req).ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = JwtUtils::verify_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid or expired token".to_string()
    })?;

    let cache_key = format!("user:{token}");
    let cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone());

    if let Some(ref cache) = cache
        && let CacheResult::Found(user) = cache.get_json::<AuthUser>(&cache_key).await
    {
        return Ok(user);
    }

    let user_id = claims
        .user_id()
        .ok_or_else(|| "Invalid subject in token".to_string())?;
    let role = claims
        .user_role()
        .ok_or_else(|| "Invalid role in token".to_string())?;

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| "Storage unavailable".to_string())?
        .get_ref()
        .clone();

    let account = storage
        .get_account_by_id(role, user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load principal {}:{}: {}", role, user_id, e);
            "Failed to retrieve user".to_string()
        })?
        .ok_or_else(|| "User not found".to_string())?;

    let user = account.to_auth_user();

    if let Some(cache) = cache {
        cache
            .insert_json(cache_key, &user, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for {} {}", user.role, user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::AuthFailed,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 处理函数中读取请求主体
impl RequireJWT {
    pub fn extract_user(req: &HttpRequest) -> Option<AuthUser> {
        req.extensions().get::<AuthUser>().cloned()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<AuthUser>().map(|user| user.id)
    }

    pub fn extract_user_role(req: &HttpRequest) -> Option<UserRole> {
        req.extensions().get::<AuthUser>().map(|user| user.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_parsing() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_srv_request();
        assert_eq!(bearer_token(&req), Some("abc.def.ghi"));

        let basic = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_srv_request();
        assert_eq!(bearer_token(&basic), None);

        let empty = TestRequest::default()
            .insert_header(("Authorization", "Bearer "))
            .to_srv_request();
        assert_eq!(bearer_token(&empty), None);
    }

    #[test]
    fn test_extract_user_from_extensions() {
        let req = TestRequest::default().to_http_request();
        assert!(RequireJWT::extract_user(&req).is_none());

        req.extensions_mut().insert(AuthUser {
            id: 3,
            role: UserRole::Student,
            name: "Isha Verma".into(),
            email: "isha.verma@campusflow.in".into(),
            department: Some("IT".into()),
        });
        assert_eq!(RequireJWT::extract_user_id(&req), Some(3));
        assert_eq!(RequireJWT::extract_user_role(&req), Some(UserRole::Student));
    }
}
