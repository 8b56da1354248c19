use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::AdminService;
use crate::models::classes::requests::DepartmentCountsQuery;
use crate::models::classes::responses::{DepartmentClass, DepartmentDetail};
use crate::models::users::responses::TeacherBrief;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::server_error;

pub async fn list_departments(
    service: &AdminService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_student_departments().await {
        Ok(departments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            departments,
            "Departments retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list departments: {}", e);
            Ok(server_error())
        }
    }
}

pub async fn department_counts(
    service: &AdminService,
    request: &HttpRequest,
    query: DepartmentCountsQuery,
) -> ActixResult<HttpResponse> {
    let Some(department) = query
        .department_name
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::DepartmentRequired,
            "Department name is required",
        )));
    };

    let storage = service.get_storage(request);
    match storage.count_department(department).await {
        Ok(counts) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            counts,
            "Department counts retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to count department {}: {}", department, e);
            Ok(server_error())
        }
    }
}

pub async fn department_detail(
    service: &AdminService,
    request: &HttpRequest,
    name: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let classes = match storage.list_classes_by_department(&name).await {
        Ok(classes) => classes,
        Err(e) => {
            error!("Failed to list classes of department {}: {}", name, e);
            return Ok(server_error());
        }
    };

    let mut department_classes = Vec::with_capacity(classes.len());
    for class in classes {
        let students = match storage.list_students_by_class(class.id).await {
            Ok(students) => students.into_iter().map(|s| s.id).collect(),
            Err(e) => {
                error!("Failed to list students of class {}: {}", class.id, e);
                return Ok(server_error());
            }
        };
        department_classes.push(DepartmentClass {
            id: class.id,
            name: class.name,
            students,
        });
    }

    let teachers = match storage.list_teachers_by_department(&name).await {
        Ok(teachers) => teachers.iter().map(TeacherBrief::from).collect(),
        Err(e) => {
            error!("Failed to list teachers of department {}: {}", name, e);
            return Ok(server_error());
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        DepartmentDetail {
            name,
            classes: department_classes,
            teachers,
        },
        "Department retrieved successfully",
    )))
}
