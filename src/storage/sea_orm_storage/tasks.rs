use std::collections::HashMap;

use super::{SeaOrmStorage, db_error};
use crate::entity::{students, task_submissions, tasks};
use crate::errors::Result;
use crate::models::tasks::{
    entities::{Task, TaskSubmission},
    requests::{NewTask, SubmissionUpsert},
    responses::SubmissionView,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn create_task_impl(&self, req: NewTask) -> Result<Task> {
        let details = serde_json::to_string(&req.details)?;

        let model = tasks::ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            class_id: Set(req.class_id),
            teacher_id: Set(req.teacher_id),
            task_type: Set(req.details.task_type().to_string()),
            file_url: Set(req.file_url),
            form_link: Set(req.form_link),
            details: Set(Some(details)),
            deadline: Set(req.deadline.timestamp()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("创建任务失败", e))?;

        Ok(result.into_task())
    }

    pub async fn get_task_by_id_impl(&self, task_id: i64) -> Result<Option<Task>> {
        let result = tasks::Entity::find_by_id(task_id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询任务失败", e))?;

        Ok(result.map(|m| m.into_task()))
    }

    pub async fn list_tasks_by_teacher_impl(&self, teacher_id: i64) -> Result<Vec<Task>> {
        let result = tasks::Entity::find()
            .filter(tasks::Column::TeacherId.eq(teacher_id))
            .order_by_desc(tasks::Column::CreatedAt)
            .order_by_desc(tasks::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询教师任务失败", e))?;

        Ok(result.into_iter().map(|m| m.into_task()).collect())
    }

    pub async fn list_tasks_by_class_impl(&self, class_id: i64) -> Result<Vec<Task>> {
        let result = tasks::Entity::find()
            .filter(tasks::Column::ClassId.eq(class_id))
            .order_by_asc(tasks::Column::Deadline)
            .order_by_asc(tasks::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询班级任务失败", e))?;

        Ok(result.into_iter().map(|m| m.into_task()).collect())
    }

    /// 删除任务及其全部提交
    pub async fn delete_task_impl(&self, task_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| db_error("开启事务失败", e))?;

        task_submissions::Entity::delete_many()
            .filter(task_submissions::Column::TaskId.eq(task_id))
            .exec(&txn)
            .await
            .map_err(|e| db_error("删除任务提交失败", e))?;

        let result = tasks::Entity::delete_by_id(task_id)
            .exec(&txn)
            .await
            .map_err(|e| db_error("删除任务失败", e))?;

        txn.commit()
            .await
            .map_err(|e| db_error("提交事务失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 每个 (任务, 学生) 只保留一条提交，重复提交覆盖旧记录
    pub async fn upsert_submission_impl(
        &self,
        req: SubmissionUpsert,
    ) -> Result<(TaskSubmission, Option<TaskSubmission>)> {
        let payload = serde_json::to_string(&req.payload)?;

        let existing = task_submissions::Entity::find()
            .filter(task_submissions::Column::TaskId.eq(req.task_id))
            .filter(task_submissions::Column::StudentId.eq(req.student_id))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询提交失败", e))?;

        match existing {
            Some(old) => {
                let previous = old.clone().into_submission();
                let mut active = old.into_active_model();
                active.status = Set(req.status.to_string());
                active.file_url = Set(req.file_url);
                active.payload = Set(Some(payload));
                active.submitted_at = Set(Some(req.submitted_at.timestamp()));

                let updated = active
                    .update(&self.db)
                    .await
                    .map_err(|e| db_error("更新提交失败", e))?;

                Ok((updated.into_submission(), Some(previous)))
            }
            None => {
                let model = task_submissions::ActiveModel {
                    task_id: Set(req.task_id),
                    student_id: Set(req.student_id),
                    status: Set(req.status.to_string()),
                    file_url: Set(req.file_url),
                    payload: Set(Some(payload)),
                    submitted_at: Set(Some(req.submitted_at.timestamp())),
                    ..Default::default()
                };

                let created = model
                    .insert(&self.db)
                    .await
                    .map_err(|e| db_error("创建提交失败", e))?;

                Ok((created.into_submission(), None))
            }
        }
    }

    pub async fn get_submission_impl(
        &self,
        task_id: i64,
        student_id: i64,
    ) -> Result<Option<TaskSubmission>> {
        let result = task_submissions::Entity::find()
            .filter(task_submissions::Column::TaskId.eq(task_id))
            .filter(task_submissions::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询提交失败", e))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 任务的全部提交，附带学生信息
    pub async fn list_submissions_by_task_impl(&self, task_id: i64) -> Result<Vec<SubmissionView>> {
        let submissions = task_submissions::Entity::find()
            .filter(task_submissions::Column::TaskId.eq(task_id))
            .order_by_asc(task_submissions::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询任务提交失败", e))?;

        if submissions.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = submissions.iter().map(|s| s.student_id).collect();
        let student_map: HashMap<i64, students::Model> = students::Entity::find()
            .filter(students::Column::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询提交学生失败", e))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        Ok(submissions
            .into_iter()
            .map(|m| {
                let student = student_map.get(&m.student_id);
                SubmissionView {
                    student_name: student.map(|s| s.name.clone()),
                    roll_number: student.map(|s| s.roll_number.clone()),
                    department: student.map(|s| s.department.clone()),
                    submission: m.into_submission(),
                }
            })
            .collect())
    }

    pub async fn list_submissions_by_student_impl(
        &self,
        student_id: i64,
        task_ids: &[i64],
    ) -> Result<Vec<TaskSubmission>> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = task_submissions::Entity::find()
            .filter(task_submissions::Column::StudentId.eq(student_id))
            .filter(task_submissions::Column::TaskId.is_in(task_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询学生提交失败", e))?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{SeaOrmStorage, memory_storage};
    use crate::models::tasks::{
        entities::{QuizSubmission, SubmissionPayload, SubmissionStatus, TaskDetails, TaskType},
        requests::{NewTask, SubmissionUpsert},
    };
    use crate::models::users::requests::{NewStudent, NewTeacher};

    async fn seed(storage: &SeaOrmStorage) -> (i64, i64, i64) {
        let teacher = storage
            .create_teacher_impl(NewTeacher {
                name: "Meera Iyer".into(),
                email: "meera.iyer@campusflow.in".into(),
                password_hash: "hash".into(),
                department: "CSE".into(),
                employee_id: "EMP10".into(),
                specialization: vec![],
            })
            .await
            .unwrap();
        let (class, _) = storage
            .find_or_create_class_impl("CSE-A", "CSE")
            .await
            .unwrap();
        let student = storage
            .create_student_impl(NewStudent {
                name: "Arjun Das".into(),
                email: "arjun.das@campusflow.in".into(),
                password_hash: "hash".into(),
                roll_number: "CSE001".into(),
                department: "CSE".into(),
                class_id: Some(class.id),
                year: Some(2),
            })
            .await
            .unwrap();
        (teacher.id, class.id, student.id)
    }

    fn quiz_task(teacher_id: i64, class_id: i64) -> NewTask {
        NewTask {
            title: "Quiz 1".into(),
            description: "Warm-up quiz".into(),
            class_id,
            teacher_id,
            file_url: None,
            form_link: None,
            details: TaskDetails::empty_for(TaskType::Quiz),
            deadline: chrono::Utc::now() + chrono::Duration::days(1),
        }
    }

    fn quiz_submission(task_id: i64, student_id: i64, score: i32) -> SubmissionUpsert {
        SubmissionUpsert {
            task_id,
            student_id,
            status: SubmissionStatus::Submitted,
            file_url: None,
            payload: SubmissionPayload::Quiz(QuizSubmission { quiz_score: score }),
            submitted_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_resubmission_replaces_previous() {
        let storage = memory_storage().await;
        let (teacher_id, class_id, student_id) = seed(&storage).await;
        let task = storage
            .create_task_impl(quiz_task(teacher_id, class_id))
            .await
            .unwrap();
        assert_eq!(task.task_type, TaskType::Quiz);

        let (first, old) = storage
            .upsert_submission_impl(quiz_submission(task.id, student_id, 6))
            .await
            .unwrap();
        assert!(old.is_none());

        let (second, old) = storage
            .upsert_submission_impl(quiz_submission(task.id, student_id, 9))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(
            old.and_then(|s| s.payload),
            Some(SubmissionPayload::Quiz(QuizSubmission { quiz_score: 6 }))
        );

        let views = storage.list_submissions_by_task_impl(task.id).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].roll_number.as_deref(), Some("CSE001"));
        assert_eq!(
            views[0].submission.payload,
            Some(SubmissionPayload::Quiz(QuizSubmission { quiz_score: 9 }))
        );
    }

    #[tokio::test]
    async fn test_delete_task_removes_submissions() {
        let storage = memory_storage().await;
        let (teacher_id, class_id, student_id) = seed(&storage).await;
        let task = storage
            .create_task_impl(quiz_task(teacher_id, class_id))
            .await
            .unwrap();
        storage
            .upsert_submission_impl(quiz_submission(task.id, student_id, 5))
            .await
            .unwrap();

        assert!(storage.delete_task_impl(task.id).await.unwrap());
        assert!(storage.get_task_by_id_impl(task.id).await.unwrap().is_none());
        assert!(
            storage
                .get_submission_impl(task.id, student_id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(!storage.delete_task_impl(task.id).await.unwrap());
    }
}
