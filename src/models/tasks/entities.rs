use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    /// 任务类型
    #[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
    pub enum TaskType {
        Document => "document",
        Form => "form",
        Hackathon => "hackathon",
        Quiz => "quiz",
        Project => "project",
    }
}

crate::define_string_enum! {
    /// 提交状态
    #[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
    pub enum SubmissionStatus {
        Pending => "pending",
        Submitted => "submitted",
        Late => "late",
    }
}

impl SubmissionStatus {
    /// 截止时间之后的提交记为 late
    pub fn for_submission_at(
        now: chrono::DateTime<chrono::Utc>,
        deadline: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        if now > deadline {
            SubmissionStatus::Late
        } else {
            SubmissionStatus::Submitted
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct HackathonDetails {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub platform: Option<String>,
    pub registration_link: Option<String>,
    pub requirements: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct QuizDetails {
    pub total_questions: Option<i32>,
    pub time_limit: Option<i32>,
    pub passing_score: Option<i32>,
    pub quiz_link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct ProjectDetails {
    pub requirements: Option<String>,
    pub deliverables: Vec<String>,
    pub evaluation_criteria: Vec<String>,
}

/// 按任务类型区分的扩展信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub enum TaskDetails {
    Document,
    Form,
    Hackathon(HackathonDetails),
    Quiz(QuizDetails),
    Project(ProjectDetails),
}

impl TaskDetails {
    pub fn empty_for(task_type: TaskType) -> Self {
        match task_type {
            TaskType::Document => TaskDetails::Document,
            TaskType::Form => TaskDetails::Form,
            TaskType::Hackathon => TaskDetails::Hackathon(HackathonDetails::default()),
            TaskType::Quiz => TaskDetails::Quiz(QuizDetails::default()),
            TaskType::Project => TaskDetails::Project(ProjectDetails::default()),
        }
    }

    pub fn task_type(&self) -> TaskType {
        match self {
            TaskDetails::Document => TaskType::Document,
            TaskDetails::Form => TaskType::Form,
            TaskDetails::Hackathon(_) => TaskType::Hackathon,
            TaskDetails::Quiz(_) => TaskType::Quiz,
            TaskDetails::Project(_) => TaskType::Project,
        }
    }
}

// 任务
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub class_id: i64,
    pub teacher_id: i64,
    pub task_type: TaskType,
    pub file_url: Option<String>,
    pub form_link: Option<String>,
    pub details: TaskDetails,
    pub deadline: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct FormSubmission {
    pub form_response: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct HackathonSubmission {
    pub project_link: Option<String>,
    pub team_details: Option<String>,
    pub achievements: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct QuizSubmission {
    pub quiz_score: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct ProjectSubmission {
    pub deliverables: Vec<String>,
    pub documentation: Option<String>,
    pub demo_link: Option<String>,
}

/// 按父任务类型区分的提交内容，文档类的文件路径存放在 `file_url`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub enum SubmissionPayload {
    Document,
    Form(FormSubmission),
    Hackathon(HackathonSubmission),
    Quiz(QuizSubmission),
    Project(ProjectSubmission),
}

// 任务提交记录，每个 (任务, 学生) 至多一条
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct TaskSubmission {
    pub id: i64,
    pub task_id: i64,
    pub student_id: i64,
    pub status: SubmissionStatus,
    pub file_url: Option<String>,
    pub payload: Option<SubmissionPayload>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_task_type_strings() {
        for t in TaskType::ALL {
            assert_eq!(t.as_str().parse::<TaskType>().unwrap(), *t);
        }
        assert!("essay".parse::<TaskType>().is_err());
    }

    #[test]
    fn test_submission_status_by_deadline() {
        let deadline = Utc::now();
        assert_eq!(
            SubmissionStatus::for_submission_at(deadline - Duration::minutes(1), deadline),
            SubmissionStatus::Submitted
        );
        assert_eq!(
            SubmissionStatus::for_submission_at(deadline, deadline),
            SubmissionStatus::Submitted
        );
        assert_eq!(
            SubmissionStatus::for_submission_at(deadline + Duration::seconds(1), deadline),
            SubmissionStatus::Late
        );
    }

    #[test]
    fn test_details_json_shape() {
        let details = TaskDetails::Quiz(QuizDetails {
            total_questions: Some(10),
            quiz_link: Some("https://quiz.example/1".into()),
            ..Default::default()
        });
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["type"], "quiz");
        assert_eq!(json["totalQuestions"], 10);

        let back: TaskDetails = serde_json::from_value(json).unwrap();
        assert_eq!(back.task_type(), TaskType::Quiz);
        assert_eq!(
            serde_json::to_value(TaskDetails::Document).unwrap(),
            serde_json::json!({"type": "document"})
        );
    }
}
