//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    #[sea_orm(unique)]
    pub roll_number: String,
    pub department: String,
    pub class_id: Option<i64>,
    pub year: Option<i32>,
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
    #[sea_orm(has_many = "super::task_submissions::Entity")]
    TaskSubmissions,
    #[sea_orm(has_many = "super::registrations::Entity")]
    Registrations,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::task_submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskSubmissions.def()
    }
}

impl Related<super::registrations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::users::entities::Student {
        use crate::models::users::entities::Student;

        Student {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            roll_number: self.roll_number,
            department: self.department,
            class_id: self.class_id,
            year: self.year,
            created_at: super::ts_to_datetime(self.created_at),
        }
    }
}
