pub mod export;
pub mod manage;
pub mod registration;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::events::requests::{
    CreateEventRequest, EventListParams, RegisterEventRequest, UpdateEventRequest,
};
use crate::storage::Storage;

pub use export::ExportFormat;

pub struct EventService {
    storage: Option<Arc<dyn Storage>>,
}

impl EventService {
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

    // 活动管理
    pub async fn create_event(
        &self,
        request: &HttpRequest,
        body: CreateEventRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_event(self, request, body).await
    }

    pub async fn list_events(
        &self,
        request: &HttpRequest,
        query: EventListParams,
    ) -> ActixResult<HttpResponse> {
        manage::list_events(self, request, query).await
    }

    pub async fn update_event(
        &self,
        request: &HttpRequest,
        event_id: i64,
        body: UpdateEventRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_event(self, request, event_id, body).await
    }

    pub async fn delete_event(&self, request: &HttpRequest, event_id: i64) -> ActixResult<HttpResponse> {
        manage::delete_event(self, request, event_id).await
    }

    // 报名
    pub async fn list_upcoming(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        registration::list_upcoming(self, request).await
    }

    pub async fn register(
        &self,
        request: &HttpRequest,
        body: RegisterEventRequest,
    ) -> ActixResult<HttpResponse> {
        registration::register(self, request, body).await
    }

    pub async fn cancel_registration(
        &self,
        request: &HttpRequest,
        event_id: i64,
    ) -> ActixResult<HttpResponse> {
        registration::cancel_registration(self, request, event_id).await
    }

    // 报名名单
    pub async fn list_registrations(
        &self,
        request: &HttpRequest,
        event_id: i64,
        format: ExportFormat,
    ) -> ActixResult<HttpResponse> {
        export::list_registrations(self, request, event_id, format).await
    }
}
