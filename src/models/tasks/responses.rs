use super::entities::{SubmissionStatus, Task, TaskSubmission};
use serde::Serialize;
use ts_rs::TS;

// 学生视角的任务
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct StudentTaskView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub task: Task,
    pub teacher_name: Option<String>,
    pub class_name: Option<String>,
    /// 仅包含当前学生自己的提交
    pub my_submission: Option<TaskSubmission>,
}

// 提交记录（带学生信息）
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct SubmissionView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: TaskSubmission,
    pub student_name: Option<String>,
    pub roll_number: Option<String>,
    pub department: Option<String>,
}

// 提交统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct SubmissionStats {
    pub total: i64,
    pub submitted: i64,
    pub late: i64,
    pub pending: i64,
}

impl SubmissionStats {
    pub fn from_statuses<'a>(statuses: impl IntoIterator<Item = &'a SubmissionStatus>) -> Self {
        statuses
            .into_iter()
            .fold(SubmissionStats::default(), |mut acc, status| {
                acc.total += 1;
                match status {
                    SubmissionStatus::Submitted => acc.submitted += 1,
                    SubmissionStatus::Late => acc.late += 1,
                    SubmissionStatus::Pending => acc.pending += 1,
                }
                acc
            })
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct TaskSubmissionsResponse {
    pub task: Task,
    pub submissions: Vec<SubmissionView>,
    pub statistics: SubmissionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_counts_each_status() {
        let statuses = [
            SubmissionStatus::Submitted,
            SubmissionStatus::Late,
            SubmissionStatus::Submitted,
            SubmissionStatus::Pending,
        ];
        let stats = SubmissionStats::from_statuses(&statuses);
        assert_eq!(
            stats,
            SubmissionStats {
                total: 4,
                submitted: 2,
                late: 1,
                pending: 1
            }
        );
        assert_eq!(stats.total, stats.submitted + stats.late + stats.pending);
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(SubmissionStats::from_statuses([].iter()), SubmissionStats::default());
    }
}
