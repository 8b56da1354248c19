use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AdminService;
use crate::models::classes::requests::{AssignTeacherRequest, ClassListParams};
use crate::models::classes::responses::ClassDetailResponse;
use crate::models::users::responses::{StudentBrief, TeacherBrief};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::server_error;

pub async fn list_classes(
    service: &AdminService,
    request: &HttpRequest,
    query: ClassListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_classes_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Classes retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list classes: {}", e);
            Ok(server_error())
        }
    }
}

pub async fn get_class(
    service: &AdminService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => {
            error!("Failed to load class {}: {}", class_id, e);
            return Ok(server_error());
        }
    };

    let teacher = match class.teacher_id {
        Some(teacher_id) => match storage.get_teacher_by_id(teacher_id).await {
            Ok(teacher) => teacher.as_ref().map(TeacherBrief::from),
            Err(e) => {
                error!("Failed to load teacher {} of class {}: {}", teacher_id, class_id, e);
                return Ok(server_error());
            }
        },
        None => None,
    };

    let students = match storage.list_students_by_class(class_id).await {
        Ok(students) => students
            .into_iter()
            .map(|s| StudentBrief::from_student(s, Some(class.name.clone())))
            .collect(),
        Err(e) => {
            error!("Failed to load students of class {}: {}", class_id, e);
            return Ok(server_error());
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassDetailResponse {
            class,
            teacher,
            students,
        },
        "Class retrieved successfully",
    )))
}

pub async fn assign_teacher(
    service: &AdminService,
    request: &HttpRequest,
    class_id: i64,
    body: AssignTeacherRequest,
) -> ActixResult<HttpResponse> {
    let Some(teacher_id) = body.teacher_id else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Teacher ID is required",
        )));
    };

    let storage = service.get_storage(request);

    match storage.get_class_by_id(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => {
            error!("Failed to load class {}: {}", class_id, e);
            return Ok(server_error());
        }
    }

    match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TeacherNotFound,
                "Teacher not found",
            )));
        }
        Err(e) => {
            error!("Failed to load teacher {}: {}", teacher_id, e);
            return Ok(server_error());
        }
    }

    let class = match storage.set_class_teacher(class_id, teacher_id).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => {
            error!("Failed to assign teacher {} to class {}: {}", teacher_id, class_id, e);
            return Ok(server_error());
        }
    };

    if let Err(e) = storage.add_teacher_class(teacher_id, class_id).await {
        error!("Failed to link teacher {} with class {}: {}", teacher_id, class_id, e);
        return Ok(server_error());
    }

    info!("Teacher {} assigned to class {}", teacher_id, class_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        class,
        "Teacher assigned successfully",
    )))
}
