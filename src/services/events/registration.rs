use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use tracing::{error, info};

use super::EventService;
use crate::middlewares::require_jwt::RequireJWT;
use crate::models::events::entities::RegistrationStatus;
use crate::models::events::requests::RegisterEventRequest;
use crate::models::events::responses::UpcomingEvent;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::server_error;

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized",
    ))
}

fn already_registered() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::EventAlreadyRegistered,
        "Already registered for this event",
    ))
}

pub async fn list_upcoming(
    service: &EventService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(unauthorized());
    };

    let storage = service.get_storage(request);
    let events = match storage.list_upcoming_events(chrono::Utc::now()).await {
        Ok(events) => events,
        Err(e) => {
            error!("Failed to list upcoming events: {}", e);
            return Ok(server_error());
        }
    };

    // 只有学生存在报名状态
    let registered: HashSet<i64> = if user.role == UserRole::Student {
        match storage.list_registered_event_ids(user.id).await {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                error!("Failed to list registrations of student {}: {}", user.id, e);
                return Ok(server_error());
            }
        }
    } else {
        HashSet::new()
    };

    let events: Vec<UpcomingEvent> = events
        .into_iter()
        .map(|event| UpcomingEvent {
            is_registered: registered.contains(&event.id),
            event,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        events,
        "Upcoming events retrieved successfully",
    )))
}

pub async fn register(
    service: &EventService,
    request: &HttpRequest,
    body: RegisterEventRequest,
) -> ActixResult<HttpResponse> {
    let Some(student_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    let Some(event_id) = body.event_id else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Event ID is required",
        )));
    };

    let storage = service.get_storage(request);

    let event = match storage.get_event_by_id(event_id).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EventNotFound,
                "Event not found",
            )));
        }
        Err(e) => {
            error!("Failed to load event {}: {}", event_id, e);
            return Ok(server_error());
        }
    };

    if !event.accepts_registration_at(chrono::Utc::now()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::EventRegistrationClosed,
            "Registration deadline has passed",
        )));
    }

    let existing = match storage.get_registration(event_id, student_id).await {
        Ok(existing) => existing,
        Err(e) => {
            error!("Failed to check registration of student {} for event {}: {}", student_id, event_id, e);
            return Ok(server_error());
        }
    };

    let registration = match existing {
        Some(r) if r.status == RegistrationStatus::Registered => {
            return Ok(already_registered());
        }
        // 已取消的报名重新激活
        Some(r) => match storage
            .set_registration_status(r.id, RegistrationStatus::Registered)
            .await
        {
            Ok(Some(r)) => r,
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::RegistrationNotFound,
                    "Registration not found",
                )));
            }
            Err(e) => {
                error!("Failed to reactivate registration {}: {}", r.id, e);
                return Ok(server_error());
            }
        },
        None => match storage.create_registration(event_id, student_id).await {
            Ok(r) => r,
            Err(e) if e.is_conflict() => return Ok(already_registered()),
            Err(e) => {
                error!("Failed to register student {} for event {}: {}", student_id, event_id, e);
                return Ok(server_error());
            }
        },
    };

    info!("Student {} registered for event {}", student_id, event_id);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        registration,
        "Registered for event successfully",
    )))
}

pub async fn cancel_registration(
    service: &EventService,
    request: &HttpRequest,
    event_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(student_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    let storage = service.get_storage(request);

    let registration = match storage.get_registration(event_id, student_id).await {
        Ok(Some(r)) if r.status == RegistrationStatus::Registered => r,
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::RegistrationNotFound,
                "Registration not found",
            )));
        }
        Err(e) => {
            error!("Failed to load registration of student {} for event {}: {}", student_id, event_id, e);
            return Ok(server_error());
        }
    };

    match storage
        .set_registration_status(registration.id, RegistrationStatus::Cancelled)
        .await
    {
        Ok(Some(r)) => {
            info!("Student {} cancelled registration for event {}", student_id, event_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                r,
                "Registration cancelled successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RegistrationNotFound,
            "Registration not found",
        ))),
        Err(e) => {
            error!("Failed to cancel registration {}: {}", registration.id, e);
            Ok(server_error())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use chrono::Duration;
    use std::sync::Arc;

    use crate::models::events::requests::NewEvent;
    use crate::models::users::entities::AuthUser;
    use crate::models::users::requests::NewStudent;
    use crate::services::test_support::{body_json, request_with};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::memory_storage;

    async fn setup(deadline_offset: Duration) -> (Arc<dyn Storage>, HttpRequest, i64) {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let student = storage
            .create_student(NewStudent {
                name: "Asha Rao".into(),
                email: "asha.rao@campusflow.in".into(),
                password_hash: "x".into(),
                roll_number: "CS001".into(),
                department: "CSE".into(),
                class_id: None,
                year: Some(2),
            })
            .await
            .unwrap();
        let event = storage
            .create_event(NewEvent {
                title: "Hack Night".into(),
                description: "Overnight build session".into(),
                deadline: chrono::Utc::now() + deadline_offset,
                form_link: String::new(),
            })
            .await
            .unwrap();

        let user = AuthUser {
            id: student.id,
            role: UserRole::Student,
            name: student.name.clone(),
            email: student.email.clone(),
            department: Some(student.department.clone()),
        };
        let request = request_with(&storage, Some(user));
        (storage, request, event.id)
    }

    fn body(event_id: i64) -> RegisterEventRequest {
        RegisterEventRequest {
            event_id: Some(event_id),
        }
    }

    #[tokio::test]
    async fn test_second_registration_rejected() {
        let (_storage, request, event_id) = setup(Duration::days(3)).await;
        let service = EventService::new_lazy();

        let first = register(&service, &request, body(event_id)).await.unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = register(&service, &request, body(event_id)).await.unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        let json = body_json(second).await;
        assert_eq!(json["message"], "Already registered for this event");
        assert_eq!(json["code"], ErrorCode::EventAlreadyRegistered as i32);
    }

    #[tokio::test]
    async fn test_registration_after_deadline_rejected() {
        let (storage, request, event_id) = setup(Duration::hours(-1)).await;

        let response = register(&EventService::new_lazy(), &request, body(event_id))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Registration deadline has passed");
        assert_eq!(json["code"], ErrorCode::EventRegistrationClosed as i32);

        let student_id = RequireJWT::extract_user_id(&request).unwrap();
        assert!(storage.get_registration(event_id, student_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cancelled_registration_reactivated() {
        let (storage, request, event_id) = setup(Duration::days(3)).await;
        let service = EventService::new_lazy();

        register(&service, &request, body(event_id)).await.unwrap();
        let cancelled = cancel_registration(&service, &request, event_id).await.unwrap();
        assert_eq!(cancelled.status(), StatusCode::OK);

        let again = register(&service, &request, body(event_id)).await.unwrap();
        assert_eq!(again.status(), StatusCode::CREATED);

        let student_id = RequireJWT::extract_user_id(&request).unwrap();
        let registration = storage.get_registration(event_id, student_id).await.unwrap().unwrap();
        assert_eq!(registration.status, RegistrationStatus::Registered);
        assert_eq!(storage.list_registrations_by_event(event_id).await.unwrap().len(), 1);
    }
}
