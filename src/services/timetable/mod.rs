use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::error;

use crate::middlewares::require_jwt::RequireJWT;
use crate::models::subjects::requests::TimetableQuery;
use crate::models::users::entities::{AuthUser, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::server_error;
use crate::storage::Storage;

pub struct TimetableService {
    storage: Option<Arc<dyn Storage>>,
}

impl TimetableService {
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

    pub async fn list_timetable(
        &self,
        request: &HttpRequest,
        query: TimetableQuery,
    ) -> ActixResult<HttpResponse> {
        let Some(user) = RequireJWT::extract_user(request) else {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized",
            )));
        };

        let storage = self.get_storage(request);
        let query = match default_query_for(&storage, &user, query).await {
            Ok(query) => query,
            Err(e) => {
                error!("Failed to resolve timetable scope for {} {}: {}", user.role, user.id, e);
                return Ok(server_error());
            }
        };

        match storage.list_timetable(query).await {
            Ok(entries) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                entries,
                "Timetable retrieved successfully",
            ))),
            Err(e) => {
                error!("Failed to list timetable: {}", e);
                Ok(server_error())
            }
        }
    }
}

/// 未带过滤条件时按角色限定范围：教师看自己的课，学生看所在班级的课
async fn default_query_for(
    storage: &Arc<dyn Storage>,
    user: &AuthUser,
    query: TimetableQuery,
) -> crate::errors::Result<TimetableQuery> {
    if query.has_filters() {
        return Ok(query);
    }

    match user.role {
        UserRole::Teacher => Ok(TimetableQuery {
            teacher_id: Some(user.id),
            ..query
        }),
        UserRole::Student => {
            let class_id = storage
                .get_student_by_id(user.id)
                .await?
                .and_then(|s| s.class_id);
            let class_name = match class_id {
                Some(id) => storage.get_class_by_id(id).await?.map(|c| c.name),
                None => None,
            };
            Ok(match class_name {
                Some(name) => TimetableQuery {
                    class: Some(name),
                    ..query
                },
                None => query,
            })
        }
        UserRole::Admin => Ok(query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::memory_storage;

    fn principal(id: i64, role: UserRole) -> AuthUser {
        AuthUser {
            id,
            role,
            name: "Test".into(),
            email: "test@campusflow.in".into(),
            department: None,
        }
    }

    #[tokio::test]
    async fn test_teacher_defaults_to_own_entries() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let query = default_query_for(&storage, &principal(7, UserRole::Teacher), TimetableQuery::default())
            .await
            .unwrap();
        assert_eq!(query.teacher_id, Some(7));
    }

    #[tokio::test]
    async fn test_explicit_filters_are_kept() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let query = TimetableQuery {
            department: Some("CSE".into()),
            ..Default::default()
        };
        let query = default_query_for(&storage, &principal(7, UserRole::Teacher), query)
            .await
            .unwrap();
        assert_eq!(query.teacher_id, None);
        assert_eq!(query.department.as_deref(), Some("CSE"));
    }

    #[tokio::test]
    async fn test_student_without_class_sees_everything() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let query = default_query_for(&storage, &principal(1, UserRole::Student), TimetableQuery::default())
            .await
            .unwrap();
        assert!(!query.has_filters());
    }
}
