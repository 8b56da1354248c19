use super::entities::{Student, Teacher};
use crate::models::common::PaginatedResponse;
use serde::Serialize;
use ts_rs::TS;

pub type TeacherListResponse = PaginatedResponse<Teacher>;
pub type StudentListResponse = PaginatedResponse<Student>;

// 班级详情中的学生条目
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct StudentBrief {
    pub id: i64,
    pub name: String,
    pub roll_number: String,
    pub email: String,
    pub year: Option<i32>,
    pub department: String,
    pub class_name: Option<String>,
}

impl StudentBrief {
    pub fn from_student(student: Student, class_name: Option<String>) -> Self {
        Self {
            id: student.id,
            name: student.name,
            roll_number: student.roll_number,
            email: student.email,
            year: student.year,
            department: student.department,
            class_name,
        }
    }
}

// 教师简要信息
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct TeacherBrief {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&Teacher> for TeacherBrief {
    fn from(t: &Teacher) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            email: t.email.clone(),
        }
    }
}
