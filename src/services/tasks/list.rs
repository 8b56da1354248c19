use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use tracing::error;

use super::TaskService;
use crate::middlewares::require_jwt::RequireJWT;
use crate::models::tasks::responses::StudentTaskView;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::server_error;

fn forbidden(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(code, message))
}

pub async fn list_teacher_tasks(
    service: &TaskService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized",
        )));
    };

    let storage = service.get_storage(request);
    match storage.list_tasks_by_teacher(teacher_id).await {
        Ok(tasks) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            tasks,
            "Tasks retrieved successfully",
        ))),
        Err(e) => {
            error!("Failed to list tasks of teacher {}: {}", teacher_id, e);
            Ok(server_error())
        }
    }
}

pub async fn list_class_tasks(
    service: &TaskService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(student_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized",
        )));
    };

    let storage = service.get_storage(request);

    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => return Ok(forbidden(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => {
            error!("Failed to load student {}: {}", student_id, e);
            return Ok(server_error());
        }
    };

    match student.class_id {
        None => {
            return Ok(forbidden(
                ErrorCode::StudentClassMissing,
                "No class assigned to student",
            ));
        }
        Some(own) if own != class_id => {
            return Ok(forbidden(ErrorCode::Forbidden, "Access denied to this class"));
        }
        Some(_) => {}
    }

    let tasks = match storage.list_tasks_by_class(class_id).await {
        Ok(tasks) => tasks,
        Err(e) => {
            error!("Failed to list tasks of class {}: {}", class_id, e);
            return Ok(server_error());
        }
    };

    let class_name = match storage.get_class_by_id(class_id).await {
        Ok(class) => class.map(|c| c.name),
        Err(e) => {
            error!("Failed to load class {}: {}", class_id, e);
            return Ok(server_error());
        }
    };

    let mut teacher_names: HashMap<i64, Option<String>> = HashMap::new();
    for task in &tasks {
        if teacher_names.contains_key(&task.teacher_id) {
            continue;
        }
        match storage.get_teacher_by_id(task.teacher_id).await {
            Ok(teacher) => {
                teacher_names.insert(task.teacher_id, teacher.map(|t| t.name));
            }
            Err(e) => {
                error!("Failed to load teacher {}: {}", task.teacher_id, e);
                return Ok(server_error());
            }
        }
    }

    let task_ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
    let mut submissions: HashMap<i64, _> = match storage
        .list_submissions_by_student(student_id, &task_ids)
        .await
    {
        Ok(list) => list.into_iter().map(|s| (s.task_id, s)).collect(),
        Err(e) => {
            error!("Failed to list submissions of student {}: {}", student_id, e);
            return Ok(server_error());
        }
    };

    let views: Vec<StudentTaskView> = tasks
        .into_iter()
        .map(|task| StudentTaskView {
            teacher_name: teacher_names.get(&task.teacher_id).cloned().flatten(),
            class_name: class_name.clone(),
            my_submission: submissions.remove(&task.id),
            task,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        views,
        "Tasks retrieved successfully",
    )))
}
