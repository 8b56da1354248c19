use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::TaskService;
use super::upload::remove_stored_file;
use crate::middlewares::require_jwt::RequireJWT;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::server_error;

pub async fn delete_task(
    service: &TaskService,
    request: &HttpRequest,
    task_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized",
        )));
    };

    let storage = service.get_storage(request);

    let task = match storage.get_task_by_id(task_id).await {
        Ok(Some(task)) => task,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TaskNotFound,
                "Task not found",
            )));
        }
        Err(e) => {
            error!("Failed to load task {}: {}", task_id, e);
            return Ok(server_error());
        }
    };

    if task.teacher_id != teacher_id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::TaskPermissionDenied,
            "You can only delete your own tasks",
        )));
    }

    // 删除记录前先收集文件路径
    let mut files: Vec<String> = match storage.list_submissions_by_task(task_id).await {
        Ok(submissions) => submissions
            .into_iter()
            .filter_map(|s| s.submission.file_url)
            .collect(),
        Err(e) => {
            error!("Failed to list submissions of task {}: {}", task_id, e);
            return Ok(server_error());
        }
    };
    files.extend(task.file_url);

    match storage.delete_task(task_id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TaskNotFound,
                "Task not found",
            )));
        }
        Err(e) => {
            error!("Failed to delete task {}: {}", task_id, e);
            return Ok(server_error());
        }
    }

    for file in &files {
        remove_stored_file(file);
    }

    info!(
        "Teacher {} deleted task {} ({} files removed)",
        teacher_id,
        task_id,
        files.len()
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Task and its submissions deleted successfully",
    )))
}
