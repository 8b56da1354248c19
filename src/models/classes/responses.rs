use super::entities::Class;
use crate::models::common::PaginatedResponse;
use crate::models::users::responses::{StudentBrief, TeacherBrief};
use serde::Serialize;
use ts_rs::TS;

// 班级列表条目
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassSummary {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub student_count: i64,
    pub teacher_name: Option<String>,
}

pub type ClassListResponse = PaginatedResponse<ClassSummary>;

// 班级详情
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassDetailResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub teacher: Option<TeacherBrief>,
    pub students: Vec<StudentBrief>,
}

// 教师视角的班级
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct TeacherClassView {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub students: Vec<ClassStudent>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassStudent {
    pub id: i64,
    pub name: String,
    pub roll_number: String,
}

// 分配班级后的教师信息
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct TeacherAssignmentResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub assigned_classes: Vec<i64>,
}

// 院系统计
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct DepartmentCounts {
    pub total_classes: i64,
    pub total_students: i64,
    pub total_teachers: i64,
}

// 院系详情
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct DepartmentDetail {
    pub name: String,
    pub classes: Vec<DepartmentClass>,
    pub teachers: Vec<TeacherBrief>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct DepartmentClass {
    pub id: i64,
    pub name: String,
    pub students: Vec<i64>,
}

// 自动分班结果
#[derive(Debug, Clone, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct DistributionSummary {
    pub updated_departments: Vec<String>,
    pub created_classes: Vec<String>,
    pub updated_students: i64,
    pub errors: Vec<String>,
}
