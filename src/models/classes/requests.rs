use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

// 班级列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub department: Option<String>,
}

// 为班级指定教师
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct AssignTeacherRequest {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[ts(type = "number | null")]
    pub teacher_id: Option<i64>,
}

// 将班级分配给教师
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct AssignClassRequest {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[ts(type = "number | null")]
    pub teacher_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[ts(type = "number | null")]
    pub class_id: Option<i64>,
}

// 院系统计查询参数
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct DepartmentCountsQuery {
    pub department_name: Option<String>,
}
