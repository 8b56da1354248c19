use super::entities::TimetableEntry;
use serde::Serialize;
use ts_rs::TS;

// 课表条目（带科目与教师名称）
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct TimetableEntryView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub entry: TimetableEntry,
    pub subject_name: Option<String>,
    pub subject_code: Option<String>,
    pub teacher_name: Option<String>,
}
