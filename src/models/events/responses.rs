use super::entities::{Event, Registration};
use crate::models::common::PaginatedResponse;
use serde::Serialize;
use ts_rs::TS;

pub type EventListResponse = PaginatedResponse<Event>;

// 即将开始的活动（带当前学生报名状态）
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct UpcomingEvent {
    #[serde(flatten)]
    #[ts(flatten)]
    pub event: Event,
    pub is_registered: bool,
}

// 报名记录（带学生信息）
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/event.ts")]
pub struct RegistrationView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub registration: Registration,
    pub student_name: String,
    pub student_email: String,
    pub roll_number: String,
    pub department: String,
}
