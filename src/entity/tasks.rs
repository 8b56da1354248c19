//! 任务实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub class_id: i64,
    pub teacher_id: i64,
    pub task_type: String,
    pub file_url: Option<String>,
    pub form_link: Option<String>,
    /// 按任务类型区分的扩展字段（JSON）
    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,
    pub deadline: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::TeacherId",
        to = "super::teachers::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_many = "super::task_submissions::Entity")]
    TaskSubmissions,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::task_submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskSubmissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_task(self) -> crate::models::tasks::entities::Task {
        use crate::models::tasks::entities::{Task, TaskDetails, TaskType};

        let task_type = self
            .task_type
            .parse::<TaskType>()
            .unwrap_or(TaskType::Document);
        let details = self
            .details
            .and_then(|d| serde_json::from_str::<TaskDetails>(&d).ok())
            .unwrap_or_else(|| TaskDetails::empty_for(task_type));

        Task {
            id: self.id,
            title: self.title,
            description: self.description,
            class_id: self.class_id,
            teacher_id: self.teacher_id,
            task_type,
            file_url: self.file_url,
            form_link: self.form_link,
            details,
            deadline: super::ts_to_datetime(self.deadline),
            created_at: super::ts_to_datetime(self.created_at),
        }
    }
}
