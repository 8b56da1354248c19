use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::TaskService;
use super::payload::build_submission_payload;
use super::upload::{read_form, remove_stored_file};
use crate::config::AppConfig;
use crate::middlewares::require_jwt::RequireJWT;
use crate::models::tasks::entities::{SubmissionStatus, TaskType};
use crate::models::tasks::requests::SubmissionUpsert;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::server_error;

pub async fn submit_task(
    service: &TaskService,
    request: &HttpRequest,
    task_id: i64,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let Some(student_id) = RequireJWT::extract_user_id(request) else {
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

    // 只能提交本班的任务
    match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) if student.class_id == Some(task.class_id) => {}
        Ok(_) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::TaskPermissionDenied,
                "Task is not assigned to your class",
            )));
        }
        Err(e) => {
            error!("Failed to load student {}: {}", student_id, e);
            return Ok(server_error());
        }
    }

    let config = AppConfig::get();
    let (fields, file) = match read_form(&mut payload, &config.upload).await {
        Ok(form) => form,
        Err(e) => return Ok(e.into_response()),
    };

    // 非文档任务不保存文件
    let file = match (task.task_type, file) {
        (TaskType::Document, file) => file,
        (_, Some(f)) => {
            remove_stored_file(&f.file_url);
            None
        }
        (_, None) => None,
    };

    let submission_payload = match build_submission_payload(task.task_type, &fields, file.is_some()) {
        Ok(p) => p,
        Err(msg) => {
            if let Some(f) = &file {
                remove_stored_file(&f.file_url);
            }
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::SubmissionInvalid,
                msg,
            )));
        }
    };

    let now = chrono::Utc::now();
    let status = SubmissionStatus::for_submission_at(now, task.deadline);
    let file_url = file.as_ref().map(|f| f.file_url.clone());

    let (submission, previous) = match storage
        .upsert_submission(SubmissionUpsert {
            task_id,
            student_id,
            status,
            file_url: file_url.clone(),
            payload: submission_payload,
            submitted_at: now,
        })
        .await
    {
        Ok(result) => result,
        Err(e) => {
            error!("Failed to save submission of student {} for task {}: {}", student_id, task_id, e);
            if let Some(url) = &file_url {
                remove_stored_file(url);
            }
            return Ok(server_error());
        }
    };

    // 覆盖提交后清理旧文件
    if let Some(old_url) = previous.and_then(|p| p.file_url)
        && Some(&old_url) != file_url.as_ref()
    {
        remove_stored_file(&old_url);
    }

    info!(
        "Student {} submitted task {} ({})",
        student_id, task_id, submission.status
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Task submitted successfully",
    )))
}
