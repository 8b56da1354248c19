use crate::models::common::pagination::deserialize_optional_i64;
use serde::Deserialize;
use ts_rs::TS;

// 课表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct TimetableQuery {
    pub class: Option<String>,
    pub department: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[ts(type = "number | null")]
    pub teacher_id: Option<i64>,
}

impl TimetableQuery {
    pub fn has_filters(&self) -> bool {
        self.class.is_some() || self.department.is_some() || self.teacher_id.is_some()
    }
}

/// 新建科目（导入使用）
#[derive(Debug, Clone)]
pub struct NewSubject {
    pub name: String,
    pub code: String,
    pub department: Option<String>,
    pub credits: Option<i32>,
}

/// 新建课表条目（导入使用）
#[derive(Debug, Clone)]
pub struct NewTimetableEntry {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub class_name: String,
    pub department: String,
}
