use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::auth::teacher_login;
use crate::middlewares;
use crate::models::classes::requests::AssignClassRequest;
use crate::models::users::entities::UserRole;
use crate::services::TeacherService;

// 懒加载的全局 TeacherService 实例
static TEACHER_SERVICE: Lazy<TeacherService> = Lazy::new(TeacherService::new_lazy);

pub async fn my_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.my_classes(&req).await
}

pub async fn assign_class(
    req: HttpRequest,
    body: web::Json<AssignClassRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.assign_class(&req, body.into_inner()).await
}

// 配置路由
pub fn configure_teachers_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/teachers")
            .service(
                web::resource("/login")
                    .wrap(middlewares::RateLimit::login())
                    .route(web::post().to(teacher_login)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .service(
                        web::resource("/classes")
                            .route(web::get().to(my_classes))
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .service(
                        web::resource("/assign-class")
                            .route(web::post().to(assign_class))
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
