use std::collections::HashMap;

use super::{SeaOrmStorage, db_error};
use crate::entity::{classes, students, teacher_classes, teachers};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    classes::{
        entities::Class,
        requests::ClassListParams,
        responses::{ClassListResponse, ClassSummary, DepartmentCounts},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = classes::Entity::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询班级失败", e))?;

        Ok(result.map(|m| m.into_class()))
    }

    pub async fn get_class_by_name_impl(&self, name: &str) -> Result<Option<Class>> {
        let result = classes::Entity::find()
            .filter(classes::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询班级失败", e))?;

        Ok(result.map(|m| m.into_class()))
    }

    pub async fn list_classes_by_ids_impl(&self, class_ids: &[i64]) -> Result<Vec<Class>> {
        if class_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = classes::Entity::find()
            .filter(classes::Column::Id.is_in(class_ids.iter().copied()))
            .order_by_asc(classes::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询班级失败", e))?;

        Ok(result.into_iter().map(|m| m.into_class()).collect())
    }

    pub async fn list_classes_by_department_impl(&self, department: &str) -> Result<Vec<Class>> {
        let result = classes::Entity::find()
            .filter(classes::Column::Department.eq(department))
            .order_by_asc(classes::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询院系班级失败", e))?;

        Ok(result.into_iter().map(|m| m.into_class()).collect())
    }

    /// 班级名全局唯一；并发创建时冲突方回读已有记录
    pub async fn find_or_create_class_impl(
        &self,
        name: &str,
        department: &str,
    ) -> Result<(Class, bool)> {
        if let Some(existing) = self.get_class_by_name_impl(name).await? {
            return Ok((existing, false));
        }

        let model = classes::ActiveModel {
            name: Set(name.to_string()),
            department: Set(department.to_string()),
            teacher_id: Set(None),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(created) => Ok((created.into_class(), true)),
            Err(e) => {
                let err = db_error("创建班级失败", e);
                if err.is_conflict()
                    && let Some(existing) = self.get_class_by_name_impl(name).await?
                {
                    return Ok((existing, false));
                }
                Err(err)
            }
        }
    }

    /// 分页列出班级，附带学生数和教师姓名
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListParams,
    ) -> Result<ClassListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = classes::Entity::find();
        if let Some(ref department) = query.department {
            select = select.filter(classes::Column::Department.eq(department.as_str()));
        }

        let paginator = select
            .order_by_asc(classes::Column::Name)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| db_error("查询班级总数失败", e))?;
        let page_items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| db_error("查询班级列表失败", e))?;

        let class_ids: Vec<i64> = page_items.iter().map(|c| c.id).collect();
        let teacher_ids: Vec<i64> = page_items.iter().filter_map(|c| c.teacher_id).collect();

        // 每个班级的学生数
        let counts: HashMap<i64, i64> = if class_ids.is_empty() {
            HashMap::new()
        } else {
            students::Entity::find()
                .select_only()
                .column(students::Column::ClassId)
                .column_as(students::Column::Id.count(), "student_count")
                .filter(students::Column::ClassId.is_in(class_ids))
                .group_by(students::Column::ClassId)
                .into_tuple::<(Option<i64>, i64)>()
                .all(&self.db)
                .await
                .map_err(|e| db_error("统计班级学生失败", e))?
                .into_iter()
                .filter_map(|(class_id, count)| class_id.map(|id| (id, count)))
                .collect()
        };

        let teacher_names: HashMap<i64, String> = if teacher_ids.is_empty() {
            HashMap::new()
        } else {
            teachers::Entity::find()
                .filter(teachers::Column::Id.is_in(teacher_ids))
                .all(&self.db)
                .await
                .map_err(|e| db_error("查询班级教师失败", e))?
                .into_iter()
                .map(|t| (t.id, t.name))
                .collect()
        };

        let items = page_items
            .into_iter()
            .map(|m| {
                let student_count = counts.get(&m.id).copied().unwrap_or(0);
                let teacher_name = m.teacher_id.and_then(|id| teacher_names.get(&id).cloned());
                ClassSummary {
                    class: m.into_class(),
                    student_count,
                    teacher_name,
                }
            })
            .collect();

        Ok(PaginatedResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn set_class_teacher_impl(
        &self,
        class_id: i64,
        teacher_id: i64,
    ) -> Result<Option<Class>> {
        let result = classes::Entity::update_many()
            .col_expr(
                classes::Column::TeacherId,
                sea_orm::sea_query::Expr::value(teacher_id),
            )
            .filter(classes::Column::Id.eq(class_id))
            .exec(&self.db)
            .await
            .map_err(|e| db_error("更新班级教师失败", e))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_class_by_id_impl(class_id).await
    }

    /// 已存在的关联不重复插入
    pub async fn add_teacher_class_impl(&self, teacher_id: i64, class_id: i64) -> Result<bool> {
        let existing = teacher_classes::Entity::find()
            .filter(teacher_classes::Column::TeacherId.eq(teacher_id))
            .filter(teacher_classes::Column::ClassId.eq(class_id))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询教师班级关联失败", e))?;
        if existing.is_some() {
            return Ok(false);
        }

        let model = teacher_classes::ActiveModel {
            teacher_id: Set(teacher_id),
            class_id: Set(class_id),
            assigned_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(_) => Ok(true),
            Err(e) => {
                let err = db_error("创建教师班级关联失败", e);
                if err.is_conflict() { Ok(false) } else { Err(err) }
            }
        }
    }

    pub async fn list_teacher_class_ids_impl(&self, teacher_id: i64) -> Result<Vec<i64>> {
        teacher_classes::Entity::find()
            .select_only()
            .column(teacher_classes::Column::ClassId)
            .filter(teacher_classes::Column::TeacherId.eq(teacher_id))
            .order_by_asc(teacher_classes::Column::AssignedAt)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询教师班级失败", e))
    }

    pub async fn count_department_impl(&self, department: &str) -> Result<DepartmentCounts> {
        let total_classes = classes::Entity::find()
            .filter(classes::Column::Department.eq(department))
            .count(&self.db)
            .await
            .map_err(|e| db_error("统计院系班级失败", e))?;
        let total_students = students::Entity::find()
            .filter(students::Column::Department.eq(department))
            .count(&self.db)
            .await
            .map_err(|e| db_error("统计院系学生失败", e))?;
        let total_teachers = teachers::Entity::find()
            .filter(teachers::Column::Department.eq(department))
            .count(&self.db)
            .await
            .map_err(|e| db_error("统计院系教师失败", e))?;

        Ok(DepartmentCounts {
            total_classes: total_classes as i64,
            total_students: total_students as i64,
            total_teachers: total_teachers as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::memory_storage;
    use crate::models::users::requests::NewTeacher;

    #[tokio::test]
    async fn test_find_or_create_class_is_idempotent() {
        let storage = memory_storage().await;
        let (first, created) = storage
            .find_or_create_class_impl("CSE Class 1", "CSE")
            .await
            .unwrap();
        assert!(created);
        let (second, created_again) = storage
            .find_or_create_class_impl("CSE Class 1", "CSE")
            .await
            .unwrap();
        assert!(!created_again);
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_teacher_class_link_once() {
        let storage = memory_storage().await;
        let teacher = storage
            .create_teacher_impl(NewTeacher {
                name: "Ravi Kumar".into(),
                email: "ravi.kumar@campusflow.in".into(),
                password_hash: "hash".into(),
                department: "CSE".into(),
                employee_id: "EMP01".into(),
                specialization: vec![],
            })
            .await
            .unwrap();
        let (class, _) = storage
            .find_or_create_class_impl("CSE-A", "CSE")
            .await
            .unwrap();

        assert!(storage.add_teacher_class_impl(teacher.id, class.id).await.unwrap());
        assert!(!storage.add_teacher_class_impl(teacher.id, class.id).await.unwrap());
        assert_eq!(
            storage.list_teacher_class_ids_impl(teacher.id).await.unwrap(),
            vec![class.id]
        );

        let counts = storage.count_department_impl("CSE").await.unwrap();
        assert_eq!(counts.total_classes, 1);
        assert_eq!(counts.total_teachers, 1);
        assert_eq!(counts.total_students, 0);
    }
}
