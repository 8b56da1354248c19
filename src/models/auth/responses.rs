use crate::models::users::entities::{Account, Admin, Teacher, UserRole};
use serde::Serialize;
use ts_rs::TS;

// 登录返回的用户信息，按角色附带不同字段
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
}

impl From<&Account> for LoginUser {
    fn from(account: &Account) -> Self {
        let base = account.to_auth_user();
        let mut user = LoginUser {
            id: base.id,
            name: base.name,
            email: base.email,
            role: base.role,
            department: base.department,
            roll_number: None,
            class_id: None,
            year: None,
            employee_id: None,
        };
        match account {
            Account::Student(s) => {
                user.roll_number = Some(s.roll_number.clone());
                user.class_id = s.class_id;
                user.year = s.year;
            }
            Account::Teacher(t) => {
                user.employee_id = Some(t.employee_id.clone());
            }
            Account::Admin(_) => {}
        }
        user
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct AdminLoginResponse {
    pub token: String,
    pub admin: Admin,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct TeacherLoginResponse {
    pub token: String,
    pub teacher: Teacher,
}
