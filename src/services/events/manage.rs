use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::EventService;
use crate::models::events::requests::{
    CreateEventRequest, EventListParams, EventUpdate, NewEvent, UpdateEventRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::server_error;
use crate::utils::datetime::parse_deadline;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid_deadline() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        "Invalid deadline format",
    ))
}

fn event_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::EventNotFound,
        "Event not found",
    ))
}

pub async fn create_event(
    service: &EventService,
    request: &HttpRequest,
    body: CreateEventRequest,
) -> ActixResult<HttpResponse> {
    let (Some(title), Some(description), Some(deadline), Some(form_link)) = (
        non_blank(body.title),
        non_blank(body.description),
        non_blank(body.deadline),
        non_blank(body.form_link),
    ) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "All fields are required",
        )));
    };

    let Some(deadline) = parse_deadline(&deadline) else {
        return Ok(invalid_deadline());
    };

    let storage = service.get_storage(request);
    match storage
        .create_event(NewEvent {
            title,
            description,
            deadline,
            form_link,
        })
        .await
    {
        Ok(event) => {
            info!("Event {} created: {}", event.id, event.title);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                event,
                "Event created successfully",
            )))
        }
        Err(e) => {
            error!("Failed to create event: {}", e);
            Ok(server_error())
        }
    }
}

pub async fn list_events(
    service: &EventService,
    request: &HttpRequest,
    query: EventListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_events_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Events retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list events: {}", e);
            Ok(server_error())
        }
    }
}

pub async fn update_event(
    service: &EventService,
    request: &HttpRequest,
    event_id: i64,
    body: UpdateEventRequest,
) -> ActixResult<HttpResponse> {
    let deadline = match non_blank(body.deadline) {
        Some(raw) => match parse_deadline(&raw) {
            Some(deadline) => Some(deadline),
            None => return Ok(invalid_deadline()),
        },
        None => None,
    };

    let update = EventUpdate {
        title: non_blank(body.title),
        description: non_blank(body.description),
        deadline,
        form_link: non_blank(body.form_link),
        status: body.status,
    };

    let storage = service.get_storage(request);
    match storage.update_event(event_id, update).await {
        Ok(Some(event)) => {
            info!("Event {} updated", event_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                event,
                "Event updated successfully",
            )))
        }
        Ok(None) => Ok(event_not_found()),
        Err(e) => {
            error!("Failed to update event {}: {}", event_id, e);
            Ok(server_error())
        }
    }
}

pub async fn delete_event(
    service: &EventService,
    request: &HttpRequest,
    event_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_event(event_id).await {
        Ok(true) => {
            info!("Event {} deleted with its registrations", event_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Event and its registrations deleted successfully",
            )))
        }
        Ok(false) => Ok(event_not_found()),
        Err(e) => {
            error!("Failed to delete event {}: {}", event_id, e);
            Ok(server_error())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_trims() {
        assert_eq!(non_blank(Some("  Fest ".into())), Some("Fest".to_string()));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }
}
