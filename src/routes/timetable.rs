use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::subjects::requests::TimetableQuery;
use crate::services::TimetableService;

// 懒加载的全局 TimetableService 实例
static TIMETABLE_SERVICE: Lazy<TimetableService> = Lazy::new(TimetableService::new_lazy);

pub async fn list_timetable(
    req: HttpRequest,
    query: web::Query<TimetableQuery>,
) -> ActixResult<HttpResponse> {
    TIMETABLE_SERVICE
        .list_timetable(&req, query.into_inner())
        .await
}

// 配置路由
pub fn configure_timetable_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/timetable")
            .wrap(middlewares::RequireJWT)
            .route(web::get().to(list_timetable)),
    );
}
