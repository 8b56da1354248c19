use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::events::requests::{
    CreateEventRequest, EventListParams, RegisterEventRequest, UpdateEventRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::EventService;
use crate::services::events::ExportFormat;
use crate::utils::SafeIDI64;

// 懒加载的全局 EventService 实例
static EVENT_SERVICE: Lazy<EventService> = Lazy::new(EventService::new_lazy);

pub async fn create_event(
    req: HttpRequest,
    body: web::Json<CreateEventRequest>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.create_event(&req, body.into_inner()).await
}

pub async fn list_events(
    req: HttpRequest,
    query: web::Query<EventListParams>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.list_events(&req, query.into_inner()).await
}

pub async fn list_upcoming(req: HttpRequest) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.list_upcoming(&req).await
}

pub async fn register(
    req: HttpRequest,
    body: web::Json<RegisterEventRequest>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.register(&req, body.into_inner()).await
}

pub async fn cancel_registration(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.cancel_registration(&req, id.0).await
}

pub async fn list_registrations(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVENT_SERVICE
        .list_registrations(&req, id.0, ExportFormat::Json)
        .await
}

pub async fn export_registrations_csv(
    req: HttpRequest,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE
        .list_registrations(&req, id.0, ExportFormat::Csv)
        .await
}

pub async fn export_registrations_xlsx(
    req: HttpRequest,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE
        .list_registrations(&req, id.0, ExportFormat::Xlsx)
        .await
}

pub async fn update_event(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateEventRequest>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.update_event(&req, id.0, body.into_inner()).await
}

pub async fn delete_event(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.delete_event(&req, id.0).await
}

// 配置路由
pub fn configure_events_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/events")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/add")
                    .route(web::post().to(create_event))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/all")
                    .route(web::get().to(list_events))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            // 所有登录用户可访问
            .service(web::resource("/upcoming").route(web::get().to(list_upcoming)))
            .service(
                web::resource("/register")
                    .route(web::post().to(register))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .service(
                web::resource("/{id}/cancel")
                    .route(web::post().to(cancel_registration))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .service(
                web::resource("/{id}/registrations")
                    .route(web::get().to(list_registrations))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/{id}/registrations/csv")
                    .route(web::get().to(export_registrations_csv))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/{id}/registrations/xlsx")
                    .route(web::get().to(export_registrations_xlsx))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_event))
                    .route(web::delete().to(delete_event))
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            ),
    );
}
