pub mod admin;
pub mod auth;
pub mod events;
pub mod imports;
pub mod system;
pub mod tasks;
pub mod teachers;
pub mod timetable;

pub use admin::AdminService;
pub use auth::AuthService;
pub use events::EventService;
pub use imports::ImportService;
pub use system::SystemService;
pub use tasks::TaskService;
pub use teachers::TeacherService;
pub use timetable::TimetableService;

use actix_web::HttpResponse;

use crate::models::{ApiResponse, ErrorCode};

/// 未预期的存储或基础设施错误统一返回 500
pub(crate) fn server_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        "Server error",
    ))
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::test::TestRequest;
    use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
    use std::sync::Arc;

    use crate::models::users::entities::AuthUser;
    use crate::storage::Storage;

    /// 携带存储的请求，可选注入已认证用户
    pub(crate) fn request_with(storage: &Arc<dyn Storage>, user: Option<AuthUser>) -> HttpRequest {
        let request = TestRequest::default()
            .app_data(web::Data::new(storage.clone()))
            .to_http_request();
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
        request
    }

    pub(crate) async fn body_json(response: HttpResponse) -> serde_json::Value {
        let bytes = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
