use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::auth::{admin_login, admin_profile, admin_signup};
use crate::middlewares;
use crate::models::classes::requests::{
    AssignTeacherRequest, ClassListParams, DepartmentCountsQuery,
};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{StudentListParams, TeacherListParams};
use crate::services::{AdminService, ImportService};
use crate::utils::SafeIDI64;

// 懒加载的全局服务实例
static ADMIN_SERVICE: Lazy<AdminService> = Lazy::new(AdminService::new_lazy);
static IMPORT_SERVICE: Lazy<ImportService> = Lazy::new(ImportService::new_lazy);

pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn get_class(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.get_class(&req, class_id.0).await
}

pub async fn assign_teacher(
    req: HttpRequest,
    class_id: SafeIDI64,
    body: web::Json<AssignTeacherRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .assign_teacher(&req, class_id.0, body.into_inner())
        .await
}

pub async fn list_teachers(
    req: HttpRequest,
    query: web::Query<TeacherListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_teachers(&req, query.into_inner()).await
}

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_students(&req, query.into_inner()).await
}

pub async fn list_subjects(req: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_subjects(&req).await
}

pub async fn list_departments(req: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_departments(&req).await
}

pub async fn department_counts(
    req: HttpRequest,
    query: web::Query<DepartmentCountsQuery>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.department_counts(&req, query.into_inner()).await
}

pub async fn department_detail(
    req: HttpRequest,
    name: web::Path<String>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.department_detail(&req, name.into_inner()).await
}

pub async fn distribute_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.distribute_classes(&req).await
}

pub async fn upload_excel(
    req: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    IMPORT_SERVICE.upload_excel(&req, payload).await
}

pub async fn upload_template() -> ActixResult<HttpResponse> {
    IMPORT_SERVICE.download_template().await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            // 公开端点
            .service(
                web::resource("/signup")
                    .wrap(middlewares::RateLimit::signup())
                    .route(web::post().to(admin_signup)),
            )
            .service(
                web::resource("/login")
                    .wrap(middlewares::RateLimit::login())
                    .route(web::post().to(admin_login)),
            )
            // 其余端点仅管理员
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .wrap(middlewares::RequireJWT)
                    .route("/profile", web::get().to(admin_profile))
                    .route("/classes", web::get().to(list_classes))
                    .route("/classes/{id}", web::get().to(get_class))
                    .route(
                        "/classes/{id}/assign-teacher",
                        web::post().to(assign_teacher),
                    )
                    .route("/teachers", web::get().to(list_teachers))
                    .route("/students", web::get().to(list_students))
                    .route("/subjects", web::get().to(list_subjects))
                    .route("/departments", web::get().to(list_departments))
                    // 须在 /departments/{name} 之前注册
                    .route("/departments/counts", web::get().to(department_counts))
                    .route("/departments/{name}", web::get().to(department_detail))
                    .route("/distribute-classes", web::post().to(distribute_classes))
                    .service(
                        web::resource("/upload-excel")
                            .wrap(middlewares::RateLimit::upload())
                            .route(web::post().to(upload_excel)),
                    )
                    .route("/upload-template", web::get().to(upload_template)),
            ),
    );
}
