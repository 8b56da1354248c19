//! 管理员实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub department: String,
    pub password_hash: String,
    pub last_login: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_admin(self) -> crate::models::users::entities::Admin {
        use crate::models::users::entities::Admin;

        Admin {
            id: self.id,
            name: self.name,
            email: self.email,
            department: self.department,
            password_hash: self.password_hash,
            last_login: self.last_login.map(super::ts_to_datetime),
            created_at: super::ts_to_datetime(self.created_at),
        }
    }
}
