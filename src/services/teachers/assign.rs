use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::TeacherService;
use crate::models::classes::requests::AssignClassRequest;
use crate::models::classes::responses::TeacherAssignmentResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::server_error;

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::NotFound,
        "Teacher or class not found",
    ))
}

pub async fn assign_class(
    service: &TeacherService,
    request: &HttpRequest,
    body: AssignClassRequest,
) -> ActixResult<HttpResponse> {
    let (Some(teacher_id), Some(class_id)) = (body.teacher_id, body.class_id) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Teacher ID and class ID are required",
        )));
    };

    let storage = service.get_storage(request);

    let teacher = match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(teacher)) => teacher,
        Ok(None) => return Ok(not_found()),
        Err(e) => {
            error!("Failed to load teacher {}: {}", teacher_id, e);
            return Ok(server_error());
        }
    };

    match storage.get_class_by_id(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found()),
        Err(e) => {
            error!("Failed to load class {}: {}", class_id, e);
            return Ok(server_error());
        }
    }

    match storage.add_teacher_class(teacher_id, class_id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ClassAlreadyAssigned,
                "Class already assigned to teacher",
            )));
        }
        Err(e) => {
            error!("Failed to assign class {} to teacher {}: {}", class_id, teacher_id, e);
            return Ok(server_error());
        }
    }

    let assigned_classes = match storage.list_teacher_class_ids(teacher_id).await {
        Ok(ids) => ids,
        Err(e) => {
            error!("Failed to list classes of teacher {}: {}", teacher_id, e);
            return Ok(server_error());
        }
    };

    info!("Class {} assigned to teacher {}", class_id, teacher_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TeacherAssignmentResponse {
            id: teacher.id,
            name: teacher.name,
            email: teacher.email,
            assigned_classes,
        },
        "Class assigned successfully",
    )))
}
