use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::TaskService;
use super::payload::build_task_details;
use super::upload::{UploadedFile, read_form, remove_stored_file};
use crate::config::AppConfig;
use crate::middlewares::require_jwt::RequireJWT;
use crate::models::tasks::entities::TaskType;
use crate::models::tasks::requests::NewTask;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::server_error;
use crate::utils::datetime::parse_deadline;

fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub async fn create_task(
    service: &TaskService,
    request: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let Some(teacher_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized",
        )));
    };

    let config = AppConfig::get();
    let (fields, file) = match read_form(&mut payload, &config.upload).await {
        Ok(form) => form,
        Err(e) => return Ok(e.into_response()),
    };

    // 校验失败时丢弃已保存的附件
    let reject = |file: Option<UploadedFile>, response: HttpResponse| -> ActixResult<HttpResponse> {
        if let Some(f) = file {
            remove_stored_file(&f.file_url);
        }
        Ok(response)
    };

    let (Some(title), Some(description), Some(class), Some(deadline), Some(task_type)) = (
        fields.get_owned("title"),
        fields.get_owned("description"),
        fields.get("class"),
        fields.get("deadline"),
        fields.get("type"),
    ) else {
        return reject(file, bad_request(ErrorCode::BadRequest, "All fields are required"));
    };

    let Ok(task_type) = task_type.to_lowercase().parse::<TaskType>() else {
        return reject(file, bad_request(ErrorCode::TaskTypeInvalid, "Invalid task type"));
    };

    let Ok(class_id) = class.parse::<i64>() else {
        return reject(file, bad_request(ErrorCode::BadRequest, "Invalid class ID"));
    };

    let Some(deadline) = parse_deadline(deadline) else {
        return reject(file, bad_request(ErrorCode::BadRequest, "Invalid deadline format"));
    };

    // 只有 document 任务保留附件
    let file = match (task_type, file) {
        (TaskType::Document, file) => file,
        (_, Some(f)) => {
            remove_stored_file(&f.file_url);
            None
        }
        (_, None) => None,
    };

    let details = match build_task_details(task_type, &fields, file.is_some()) {
        Ok(details) => details,
        Err(msg) => return reject(file, bad_request(ErrorCode::BadRequest, msg)),
    };

    let storage = service.get_storage(request);
    match storage.get_class_by_id(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return reject(
                file,
                HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::ClassNotFound,
                    "Class not found",
                )),
            );
        }
        Err(e) => {
            error!("Failed to load class {}: {}", class_id, e);
            return reject(file, server_error());
        }
    }

    let form_link = match task_type {
        TaskType::Form => fields.get_owned("formLink"),
        _ => None,
    };
    let file_url = file.as_ref().map(|f| f.file_url.clone());

    match storage
        .create_task(NewTask {
            title,
            description,
            class_id,
            teacher_id,
            file_url,
            form_link,
            details,
            deadline,
        })
        .await
    {
        Ok(task) => {
            info!(
                "Teacher {} created {} task {} for class {}",
                teacher_id, task.task_type, task.id, class_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                task,
                "Task created successfully",
            )))
        }
        Err(e) => {
            error!("Failed to create task: {}", e);
            reject(file, server_error())
        }
    }
}
