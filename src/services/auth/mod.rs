pub mod login;
pub mod profile;
pub mod signup;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::auth::requests::{AdminSignupRequest, LoginRequest, RoleLoginRequest};
use crate::models::users::entities::UserRole;
use crate::storage::Storage;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 通用登录，按 role 选择账号表
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 固定角色登录
    pub async fn role_login(
        &self,
        role: UserRole,
        login_request: RoleLoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_role_login(self, role, login_request, request).await
    }

    // 管理员注册
    pub async fn admin_signup(
        &self,
        signup_request: AdminSignupRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        signup::handle_admin_signup(self, signup_request, request).await
    }

    // 管理员资料
    pub async fn admin_profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::handle_admin_profile(self, request).await
    }

    // 当前登录主体
    pub async fn me(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::handle_me(request).await
    }
}
