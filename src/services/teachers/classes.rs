use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::TeacherService;
use crate::middlewares::require_jwt::RequireJWT;
use crate::models::classes::responses::{ClassStudent, TeacherClassView};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::server_error;

pub async fn my_classes(
    service: &TeacherService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized",
        )));
    };

    let storage = service.get_storage(request);

    let class_ids = match storage.list_teacher_class_ids(teacher_id).await {
        Ok(ids) => ids,
        Err(e) => {
            error!("Failed to list classes of teacher {}: {}", teacher_id, e);
            return Ok(server_error());
        }
    };

    let classes = match storage.list_classes_by_ids(&class_ids).await {
        Ok(classes) => classes,
        Err(e) => {
            error!("Failed to load classes of teacher {}: {}", teacher_id, e);
            return Ok(server_error());
        }
    };

    let mut views = Vec::with_capacity(classes.len());
    for class in classes {
        let students = match storage.list_students_by_class(class.id).await {
            Ok(students) => students
                .into_iter()
                .map(|s| ClassStudent {
                    id: s.id,
                    name: s.name,
                    roll_number: s.roll_number,
                })
                .collect(),
            Err(e) => {
                error!("Failed to list students of class {}: {}", class.id, e);
                return Ok(server_error());
            }
        };
        views.push(TeacherClassView {
            id: class.id,
            name: class.name,
            department: class.department,
            students,
        });
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        views,
        "Classes retrieved successfully",
    )))
}
