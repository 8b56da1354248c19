//! 教师实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub department: String,
    #[sea_orm(unique)]
    pub employee_id: String,
    /// JSON 字符串数组
    pub specialization: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::teacher_classes::Entity")]
    TeacherClasses,
    #[sea_orm(has_many = "super::tasks::Entity")]
    Tasks,
}

impl Related<super::teacher_classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherClasses.def()
    }
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_teacher(self) -> crate::models::users::entities::Teacher {
        use crate::models::users::entities::Teacher;

        Teacher {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            department: self.department,
            employee_id: self.employee_id,
            specialization: self
                .specialization
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            created_at: super::ts_to_datetime(self.created_at),
        }
    }
}
