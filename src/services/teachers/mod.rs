pub mod assign;
pub mod classes;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classes::requests::AssignClassRequest;
use crate::storage::Storage;

pub struct TeacherService {
    storage: Option<Arc<dyn Storage>>,
}

impl TeacherService {
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

    // 当前教师的班级及学生
    pub async fn my_classes(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        classes::my_classes(self, request).await
    }

    // 管理员为教师分配班级
    pub async fn assign_class(
        &self,
        request: &HttpRequest,
        body: AssignClassRequest,
    ) -> ActixResult<HttpResponse> {
        assign::assign_class(self, request, body).await
    }
}
