use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::TaskService;
use crate::utils::{SafeClassIdI64, SafeSubmissionKey, SafeTaskIdI64};

// 懒加载的全局 TaskService 实例
static TASK_SERVICE: Lazy<TaskService> = Lazy::new(TaskService::new_lazy);

pub async fn create_task(
    req: HttpRequest,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE.create_task(&req, payload).await
}

pub async fn list_teacher_tasks(req: HttpRequest) -> ActixResult<HttpResponse> {
    TASK_SERVICE.list_teacher_tasks(&req).await
}

pub async fn list_class_tasks(
    req: HttpRequest,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE.list_class_tasks(&req, class_id.0).await
}

pub async fn submit_task(
    req: HttpRequest,
    task_id: SafeTaskIdI64,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE.submit_task(&req, task_id.0, payload).await
}

pub async fn list_submissions(
    req: HttpRequest,
    task_id: SafeTaskIdI64,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE.list_submissions(&req, task_id.0).await
}

pub async fn get_submission(
    req: HttpRequest,
    key: SafeSubmissionKey,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE
        .get_submission(&req, key.task_id, key.student_id)
        .await
}

pub async fn delete_task(req: HttpRequest, task_id: SafeTaskIdI64) -> ActixResult<HttpResponse> {
    TASK_SERVICE.delete_task(&req, task_id.0).await
}

// 配置路由
pub fn configure_tasks_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tasks")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/create")
                    .route(web::post().to(create_task))
                    .wrap(middlewares::RateLimit::upload())
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/teacher")
                    .route(web::get().to(list_teacher_tasks))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/class/{class_id}")
                    .route(web::get().to(list_class_tasks))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            // 权限在业务层检查（任务所属教师、管理员、学生本人）
            .service(
                web::resource("/submission/{task_id}/{student_id}")
                    .route(web::get().to(get_submission)),
            )
            .service(
                web::resource("/{task_id}/submit")
                    .route(web::post().to(submit_task))
                    .wrap(middlewares::RateLimit::upload())
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .service(
                web::resource("/{task_id}/submissions")
                    .route(web::get().to(list_submissions))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            )
            .service(
                web::resource("/{task_id}")
                    .route(web::delete().to(delete_task))
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            ),
    );
}
