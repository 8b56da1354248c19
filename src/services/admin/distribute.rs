//! 按院系自动分班
//!
//! 每个院系的学生按 ID 排序后对半分入 "<院系> Class 1" 与 "<院系> Class 2"，
//! 前半（向上取整）进 Class 1。单个院系失败只记录错误，不影响其它院系。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{error, info};

use super::AdminService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::classes::responses::DistributionSummary;
use crate::services::server_error;
use crate::storage::Storage;

/// 前 ⌈n/2⌉ 个与其余部分
pub(crate) fn split_in_half(ids: &[i64]) -> (&[i64], &[i64]) {
    ids.split_at(ids.len().div_ceil(2))
}

pub(crate) fn class_names_for(department: &str) -> [String; 2] {
    [
        format!("{department} Class 1"),
        format!("{department} Class 2"),
    ]
}

/// 处理单个院系，返回更新的学生数
async fn distribute_department(
    storage: &Arc<dyn Storage>,
    department: &str,
    summary: &mut DistributionSummary,
) -> Result<u64> {
    let [first_name, second_name] = class_names_for(department);

    let (first, created) = storage.find_or_create_class(&first_name, department).await?;
    if created {
        summary.created_classes.push(first.name.clone());
    }
    let (second, created) = storage.find_or_create_class(&second_name, department).await?;
    if created {
        summary.created_classes.push(second.name.clone());
    }

    let mut student_ids: Vec<i64> = storage
        .list_students_by_department(department)
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();
    student_ids.sort_unstable();

    let (first_half, second_half) = split_in_half(&student_ids);
    let mut updated = storage.set_students_class(first_half, first.id).await?;
    updated += storage.set_students_class(second_half, second.id).await?;

    Ok(updated)
}

pub async fn distribute_classes(
    service: &AdminService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let departments = match storage.list_student_departments().await {
        Ok(departments) => departments,
        Err(e) => {
            error!("Failed to list departments for distribution: {}", e);
            return Ok(server_error());
        }
    };

    let mut summary = DistributionSummary::default();
    for department in departments {
        match distribute_department(&storage, &department, &mut summary).await {
            Ok(updated) => {
                summary.updated_students += updated as i64;
                summary.updated_departments.push(department);
            }
            Err(e) => {
                error!("Failed to distribute department {}: {}", department, e);
                summary
                    .errors
                    .push(format!("{department}: {}", e.message()));
            }
        }
    }

    info!(
        "Class distribution finished: {} departments, {} students, {} errors",
        summary.updated_departments.len(),
        summary.updated_students,
        summary.errors.len()
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        summary,
        "Classes distributed successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::requests::NewStudent;
    use crate::storage::sea_orm_storage::memory_storage;

    #[test]
    fn test_split_rounds_first_half_up() {
        let ids = [1, 2, 3, 4, 5];
        let (a, b) = split_in_half(&ids);
        assert_eq!(a, &[1, 2, 3]);
        assert_eq!(b, &[4, 5]);

        let (a, b) = split_in_half(&[7, 8]);
        assert_eq!((a.len(), b.len()), (1, 1));

        let (a, b) = split_in_half(&[]);
        assert!(a.is_empty() && b.is_empty());
    }

    #[test]
    fn test_class_names() {
        assert_eq!(class_names_for("CSE"), ["CSE Class 1".to_string(), "CSE Class 2".to_string()]);
    }

    #[tokio::test]
    async fn test_distribute_department_assigns_both_classes() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        for i in 1..=5 {
            storage
                .create_student(NewStudent {
                    name: format!("Student {i}"),
                    email: format!("student{i}@campusflow.in"),
                    password_hash: "hash".into(),
                    roll_number: format!("ECE{i:03}"),
                    department: "ECE".into(),
                    class_id: None,
                    year: Some(1),
                })
                .await
                .unwrap();
        }

        let mut summary = DistributionSummary::default();
        let updated = distribute_department(&storage, "ECE", &mut summary)
            .await
            .unwrap();
        assert_eq!(updated, 5);
        assert_eq!(summary.created_classes.len(), 2);

        let first = storage.get_class_by_name("ECE Class 1").await.unwrap().unwrap();
        let second = storage.get_class_by_name("ECE Class 2").await.unwrap().unwrap();
        assert_eq!(storage.list_students_by_class(first.id).await.unwrap().len(), 3);
        assert_eq!(storage.list_students_by_class(second.id).await.unwrap().len(), 2);

        // 再次执行不重复建班
        let mut again = DistributionSummary::default();
        distribute_department(&storage, "ECE", &mut again).await.unwrap();
        assert!(again.created_classes.is_empty());
    }
}
