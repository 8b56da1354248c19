pub mod classes;
pub mod departments;
pub mod distribute;
pub mod roster;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classes::requests::{
    AssignTeacherRequest, ClassListParams, DepartmentCountsQuery,
};
use crate::models::users::requests::{StudentListParams, TeacherListParams};
use crate::storage::Storage;

pub struct AdminService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdminService {
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

    // 班级
    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassListParams,
    ) -> ActixResult<HttpResponse> {
        classes::list_classes(self, request, query).await
    }

    pub async fn get_class(&self, request: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        classes::get_class(self, request, class_id).await
    }

    pub async fn assign_teacher(
        &self,
        request: &HttpRequest,
        class_id: i64,
        body: AssignTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        classes::assign_teacher(self, request, class_id, body).await
    }

    // 花名册
    pub async fn list_teachers(
        &self,
        request: &HttpRequest,
        query: TeacherListParams,
    ) -> ActixResult<HttpResponse> {
        roster::list_teachers(self, request, query).await
    }

    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentListParams,
    ) -> ActixResult<HttpResponse> {
        roster::list_students(self, request, query).await
    }

    pub async fn list_subjects(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        roster::list_subjects(self, request).await
    }

    // 院系
    pub async fn list_departments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        departments::list_departments(self, request).await
    }

    pub async fn department_counts(
        &self,
        request: &HttpRequest,
        query: DepartmentCountsQuery,
    ) -> ActixResult<HttpResponse> {
        departments::department_counts(self, request, query).await
    }

    pub async fn department_detail(
        &self,
        request: &HttpRequest,
        name: String,
    ) -> ActixResult<HttpResponse> {
        departments::department_detail(self, request, name).await
    }

    // 自动分班
    pub async fn distribute_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        distribute::distribute_classes(self, request).await
    }
}
