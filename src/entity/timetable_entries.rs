//! 课表条目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "timetable_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub class_name: String,
    pub department: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::TeacherId",
        to = "super::teachers::Column::Id"
    )]
    Teacher,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_timetable_entry(self) -> crate::models::subjects::entities::TimetableEntry {
        crate::models::subjects::entities::TimetableEntry {
            id: self.id,
            day: self.day,
            start_time: self.start_time,
            end_time: self.end_time,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            class_name: self.class_name,
            department: self.department,
        }
    }
}
