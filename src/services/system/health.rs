use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Serialize;

use super::SystemService;
use crate::models::AppStartTime;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime_seconds: Option<i64>,
}

pub async fn health(_service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let uptime_seconds = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| (chrono::Utc::now() - start.start_datetime).num_seconds());

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        message: "Server is running",
        uptime_seconds,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[tokio::test]
    async fn test_health_without_start_time() {
        let request = TestRequest::default().to_http_request();
        let response = health(&SystemService::new_lazy(), &request).await.unwrap();
        assert_eq!(response.status(), actix_web::http::StatusCode::OK);
    }

    #[test]
    fn test_health_body_shape() {
        let json = serde_json::to_value(HealthResponse {
            status: "ok",
            message: "Server is running",
            uptime_seconds: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok", "message": "Server is running"}));
    }
}
