use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};
use std::path::Path;
use tracing::error;

use super::TaskService;
use crate::errors::CampusFlowError;
use crate::middlewares::require_jwt::RequireJWT;
use crate::models::tasks::entities::{SubmissionPayload, Task};
use crate::models::tasks::responses::{SubmissionStats, TaskSubmissionsResponse};
use crate::models::users::entities::{AuthUser, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::server_error;
use crate::utils::file_magic::content_type_for;

fn task_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::TaskNotFound,
        "Task not found",
    ))
}

/// 任务所属教师、管理员或提交者本人可以查看提交
pub(crate) fn can_view_submission(user: &AuthUser, task: &Task, student_id: i64) -> bool {
    match user.role {
        UserRole::Admin => true,
        UserRole::Teacher => task.teacher_id == user.id,
        UserRole::Student => user.id == student_id,
    }
}

pub async fn list_submissions(
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
        Ok(None) => return Ok(task_not_found()),
        Err(e) => {
            error!("Failed to load task {}: {}", task_id, e);
            return Ok(server_error());
        }
    };

    if task.teacher_id != teacher_id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::TaskPermissionDenied,
            "You can only view submissions of your own tasks",
        )));
    }

    let submissions = match storage.list_submissions_by_task(task_id).await {
        Ok(submissions) => submissions,
        Err(e) => {
            error!("Failed to list submissions of task {}: {}", task_id, e);
            return Ok(server_error());
        }
    };

    let statistics = SubmissionStats::from_statuses(submissions.iter().map(|s| &s.submission.status));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TaskSubmissionsResponse {
            task,
            submissions,
            statistics,
        },
        "Submissions retrieved successfully",
    )))
}

pub async fn get_submission(
    service: &TaskService,
    request: &HttpRequest,
    task_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized",
        )));
    };

    let storage = service.get_storage(request);

    let task = match storage.get_task_by_id(task_id).await {
        Ok(Some(task)) => task,
        Ok(None) => return Ok(task_not_found()),
        Err(e) => {
            error!("Failed to load task {}: {}", task_id, e);
            return Ok(server_error());
        }
    };

    if !can_view_submission(&user, &task, student_id) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Access denied.",
        )));
    }

    let submission = match storage.get_submission(task_id, student_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            )));
        }
        Err(e) => {
            error!("Failed to load submission {}/{}: {}", task_id, student_id, e);
            return Ok(server_error());
        }
    };

    let stored_file = match (&submission.payload, &submission.file_url) {
        (Some(SubmissionPayload::Document), Some(url)) => Some(url.clone()),
        _ => None,
    };

    let Some(file_url) = stored_file else {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            submission,
            "Submission retrieved successfully",
        )));
    };

    let data = match tokio::fs::read(&file_url).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FileNotFound,
                "Submission file not found",
            )));
        }
        Err(e) => {
            error!("{}", CampusFlowError::file_operation(format!("{file_url}: {e}")));
            return Ok(server_error());
        }
    };

    let extension = Path::new(&file_url)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type_for(&extension)))
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"submission-{task_id}-{student_id}.{extension}\""),
        ))
        .body(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tasks::entities::{TaskDetails, TaskType};

    fn task(teacher_id: i64) -> Task {
        Task {
            id: 1,
            title: "Essay".into(),
            description: "Write".into(),
            class_id: 2,
            teacher_id,
            task_type: TaskType::Document,
            file_url: None,
            form_link: None,
            details: TaskDetails::Document,
            deadline: chrono::Utc::now(),
            created_at: chrono::Utc::now(),
        }
    }

    fn user(id: i64, role: UserRole) -> AuthUser {
        AuthUser {
            id,
            role,
            name: "U".into(),
            email: "u@campusflow.in".into(),
            department: None,
        }
    }

    #[test]
    fn test_submission_visibility() {
        let t = task(10);
        assert!(can_view_submission(&user(10, UserRole::Teacher), &t, 5));
        assert!(!can_view_submission(&user(11, UserRole::Teacher), &t, 5));
        assert!(can_view_submission(&user(1, UserRole::Admin), &t, 5));
        assert!(can_view_submission(&user(5, UserRole::Student), &t, 5));
        assert!(!can_view_submission(&user(6, UserRole::Student), &t, 5));
    }
}
