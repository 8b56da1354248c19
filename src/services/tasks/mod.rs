pub mod create;
pub mod delete;
pub mod list;
pub mod payload;
pub mod submissions;
pub mod submit;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct TaskService {
    storage: Option<Arc<dyn Storage>>,
}

impl TaskService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 教师发布任务
    pub async fn create_task(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        create::create_task(self, request, payload).await
    }

    pub async fn list_teacher_tasks(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_teacher_tasks(self, request).await
    }

    pub async fn list_class_tasks(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_class_tasks(self, request, class_id).await
    }

    // 学生提交
    pub async fn submit_task(
        &self,
        request: &HttpRequest,
        task_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        submit::submit_task(self, request, task_id, payload).await
    }

    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        task_id: i64,
    ) -> ActixResult<HttpResponse> {
        submissions::list_submissions(self, request, task_id).await
    }

    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        task_id: i64,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        submissions::get_submission(self, request, task_id, student_id).await
    }

    pub async fn delete_task(&self, request: &HttpRequest, task_id: i64) -> ActixResult<HttpResponse> {
        delete::delete_task(self, request, task_id).await
    }
}
