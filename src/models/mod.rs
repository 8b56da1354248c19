pub mod auth;
pub mod classes;
pub mod common;
pub mod events;
pub mod imports;
pub mod subjects;
pub mod tasks;
pub mod users;

pub use common::*;

/// 程序启动时间，用于健康检查中的运行时长
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
