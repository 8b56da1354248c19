use std::collections::HashMap;

use super::{SeaOrmStorage, db_error};
use crate::entity::{subjects, teachers, timetable_entries};
use crate::errors::Result;
use crate::models::subjects::{
    entities::{Subject, TimetableEntry},
    requests::{NewSubject, NewTimetableEntry, TimetableQuery},
    responses::TimetableEntryView,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_subject_impl(&self, req: NewSubject) -> Result<Subject> {
        let model = subjects::ActiveModel {
            name: Set(req.name),
            code: Set(req.code),
            department: Set(req.department),
            credits: Set(req.credits),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("创建科目失败", e))?;

        Ok(result.into_subject())
    }

    pub async fn get_subject_by_code_impl(&self, code: &str) -> Result<Option<Subject>> {
        let result = subjects::Entity::find()
            .filter(subjects::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询科目失败", e))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn get_subject_by_name_impl(&self, name: &str) -> Result<Option<Subject>> {
        let result = subjects::Entity::find()
            .filter(subjects::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询科目失败", e))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn list_subjects_impl(&self) -> Result<Vec<Subject>> {
        let result = subjects::Entity::find()
            .order_by_asc(subjects::Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询科目列表失败", e))?;

        Ok(result.into_iter().map(|m| m.into_subject()).collect())
    }

    pub async fn create_timetable_entry_impl(
        &self,
        req: NewTimetableEntry,
    ) -> Result<TimetableEntry> {
        let model = timetable_entries::ActiveModel {
            day: Set(req.day),
            start_time: Set(req.start_time),
            end_time: Set(req.end_time),
            subject_id: Set(req.subject_id),
            teacher_id: Set(req.teacher_id),
            class_name: Set(req.class_name),
            department: Set(req.department),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("创建课表条目失败", e))?;

        Ok(result.into_timetable_entry())
    }

    /// 按班级、院系或教师过滤课表，并补充科目与教师名称
    pub async fn list_timetable_impl(
        &self,
        query: TimetableQuery,
    ) -> Result<Vec<TimetableEntryView>> {
        let mut select = timetable_entries::Entity::find();

        if let Some(ref class_name) = query.class {
            select = select.filter(timetable_entries::Column::ClassName.eq(class_name.as_str()));
        }
        if let Some(ref department) = query.department {
            select = select.filter(timetable_entries::Column::Department.eq(department.as_str()));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(timetable_entries::Column::TeacherId.eq(teacher_id));
        }

        let entries = select
            .order_by_asc(timetable_entries::Column::Day)
            .order_by_asc(timetable_entries::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询课表失败", e))?;

        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let subject_ids: Vec<i64> = entries.iter().map(|e| e.subject_id).collect();
        let teacher_ids: Vec<i64> = entries.iter().map(|e| e.teacher_id).collect();

        let subject_map: HashMap<i64, subjects::Model> = subjects::Entity::find()
            .filter(subjects::Column::Id.is_in(subject_ids))
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询课表科目失败", e))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let teacher_names: HashMap<i64, String> = teachers::Entity::find()
            .filter(teachers::Column::Id.is_in(teacher_ids))
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询课表教师失败", e))?
            .into_iter()
            .map(|t| (t.id, t.name))
            .collect();

        Ok(entries
            .into_iter()
            .map(|m| {
                let subject = subject_map.get(&m.subject_id);
                let teacher_name = teacher_names.get(&m.teacher_id).cloned();
                TimetableEntryView {
                    subject_name: subject.map(|s| s.name.clone()),
                    subject_code: subject.map(|s| s.code.clone()),
                    teacher_name,
                    entry: m.into_timetable_entry(),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::memory_storage;
    use crate::models::subjects::requests::{NewSubject, NewTimetableEntry, TimetableQuery};
    use crate::models::users::requests::NewTeacher;

    #[tokio::test]
    async fn test_timetable_filters_and_names() {
        let storage = memory_storage().await;
        let teacher = storage
            .create_teacher_impl(NewTeacher {
                name: "Anita Rao".into(),
                email: "anita.rao@campusflow.in".into(),
                password_hash: "hash".into(),
                department: "ECE".into(),
                employee_id: "EMP02".into(),
                specialization: vec!["Signals".into()],
            })
            .await
            .unwrap();
        let subject = storage
            .create_subject_impl(NewSubject {
                name: "Signals and Systems".into(),
                code: "EC201".into(),
                department: Some("ECE".into()),
                credits: Some(4),
            })
            .await
            .unwrap();

        for (class_name, day) in [("ECE-A", "Monday"), ("ECE-B", "Tuesday")] {
            storage
                .create_timetable_entry_impl(NewTimetableEntry {
                    day: day.into(),
                    start_time: "09:00".into(),
                    end_time: "10:00".into(),
                    subject_id: subject.id,
                    teacher_id: teacher.id,
                    class_name: class_name.into(),
                    department: "ECE".into(),
                })
                .await
                .unwrap();
        }

        let filtered = storage
            .list_timetable_impl(TimetableQuery {
                class: Some("ECE-A".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].subject_code.as_deref(), Some("EC201"));
        assert_eq!(filtered[0].teacher_name.as_deref(), Some("Anita Rao"));

        let by_teacher = storage
            .list_timetable_impl(TimetableQuery {
                teacher_id: Some(teacher.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_teacher.len(), 2);
    }

    #[tokio::test]
    async fn test_subject_code_unique() {
        let storage = memory_storage().await;
        let subject = NewSubject {
            name: "Maths".into(),
            code: "MA101".into(),
            department: None,
            credits: None,
        };
        storage.create_subject_impl(subject.clone()).await.unwrap();
        let err = storage
            .create_subject_impl(NewSubject {
                name: "Maths II".into(),
                ..subject
            })
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }
}
