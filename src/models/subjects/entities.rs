use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 科目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub department: Option<String>,
    pub credits: Option<i32>,
}

// 课表条目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct TimetableEntry {
    pub id: i64,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub class_name: String,
    pub department: String,
}
