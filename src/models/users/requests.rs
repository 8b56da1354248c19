use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 教师列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct TeacherListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub department: Option<String>,
    pub search: Option<String>,
}

// 学生列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub department: Option<String>,
    #[serde(default, deserialize_with = "crate::models::common::pagination::deserialize_optional_i64")]
    #[ts(type = "number | null")]
    pub class_id: Option<i64>,
    pub search: Option<String>,
}

/// 新建学生（存储层使用，密码已哈希）
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub roll_number: String,
    pub department: String,
    pub class_id: Option<i64>,
    pub year: Option<i32>,
}

/// 新建教师（存储层使用，密码已哈希）
#[derive(Debug, Clone)]
pub struct NewTeacher {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub department: String,
    pub employee_id: String,
    pub specialization: Vec<String>,
}

/// 新建管理员（存储层使用，密码已哈希）
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub department: String,
    pub password_hash: String,
}
