//! 按任务类型构造任务详情与提交内容

use crate::models::tasks::entities::{
    FormSubmission, HackathonDetails, HackathonSubmission, ProjectDetails, ProjectSubmission,
    QuizDetails, QuizSubmission, SubmissionPayload, TaskDetails, TaskType,
};
use crate::models::tasks::requests::FormFields;

/// 逗号分隔的列表，忽略空项
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_int(fields: &FormFields, key: &str) -> Result<Option<i32>, String> {
    match fields.get(key) {
        Some(v) => v
            .parse::<i32>()
            .map(Some)
            .map_err(|_| format!("{key} must be an integer")),
        None => Ok(None),
    }
}

/// 构造任务详情
///
/// document 需要附件，form 需要 formLink。
pub fn build_task_details(
    task_type: TaskType,
    fields: &FormFields,
    has_file: bool,
) -> Result<TaskDetails, String> {
    let details = match task_type {
        TaskType::Document => {
            if !has_file {
                return Err("File is required for document tasks".to_string());
            }
            TaskDetails::Document
        }
        TaskType::Form => {
            if fields.get("formLink").is_none() {
                return Err("Form link is required for form tasks".to_string());
            }
            TaskDetails::Form
        }
        TaskType::Hackathon => TaskDetails::Hackathon(HackathonDetails {
            start_date: fields.get_owned("startDate"),
            end_date: fields.get_owned("endDate"),
            platform: fields.get_owned("platform"),
            registration_link: fields.get_owned("registrationLink"),
            requirements: fields.get_owned("requirements"),
        }),
        TaskType::Quiz => TaskDetails::Quiz(QuizDetails {
            total_questions: parse_int(fields, "totalQuestions")?,
            time_limit: parse_int(fields, "timeLimit")?,
            passing_score: parse_int(fields, "passingScore")?,
            quiz_link: fields.get_owned("quizLink"),
        }),
        TaskType::Project => TaskDetails::Project(ProjectDetails {
            requirements: fields.get_owned("requirements"),
            deliverables: fields.get("deliverables").map(split_list).unwrap_or_default(),
            evaluation_criteria: fields
                .get("evaluationCriteria")
                .map(split_list)
                .unwrap_or_default(),
        }),
    };
    Ok(details)
}

/// 构造提交内容
///
/// document 需要文件，quiz 需要整数 quizScore；formResponse 优先按 JSON 解析，失败时按字符串保存。
pub fn build_submission_payload(
    task_type: TaskType,
    fields: &FormFields,
    has_file: bool,
) -> Result<SubmissionPayload, String> {
    let payload = match task_type {
        TaskType::Document => {
            if !has_file {
                return Err("File is required for document submissions".to_string());
            }
            SubmissionPayload::Document
        }
        TaskType::Form => {
            let form_response = match fields.get("formResponse") {
                Some(raw) => serde_json::from_str(raw)
                    .unwrap_or_else(|_| serde_json::Value::String(raw.to_string())),
                None => serde_json::Value::Null,
            };
            SubmissionPayload::Form(FormSubmission { form_response })
        }
        TaskType::Hackathon => SubmissionPayload::Hackathon(HackathonSubmission {
            project_link: fields.get_owned("projectLink"),
            team_details: fields.get_owned("teamDetails"),
            achievements: fields.get_owned("achievements"),
        }),
        TaskType::Quiz => {
            let quiz_score = parse_int(fields, "quizScore")?
                .ok_or_else(|| "Quiz score is required".to_string())?;
            SubmissionPayload::Quiz(QuizSubmission { quiz_score })
        }
        TaskType::Project => SubmissionPayload::Project(ProjectSubmission {
            deliverables: fields.get("deliverables").map(split_list).unwrap_or_default(),
            documentation: fields.get_owned("documentation"),
            demo_link: fields.get_owned("demoLink"),
        }),
    };
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" report, slides ,, demo "), vec!["report", "slides", "demo"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_document_requires_file() {
        let fields = FormFields::default();
        assert!(build_task_details(TaskType::Document, &fields, false).is_err());
        assert_eq!(
            build_task_details(TaskType::Document, &fields, true).unwrap(),
            TaskDetails::Document
        );
        assert!(build_submission_payload(TaskType::Document, &fields, false).is_err());
    }

    #[test]
    fn test_form_requires_link() {
        assert!(build_task_details(TaskType::Form, &FormFields::default(), false).is_err());
        let fields = FormFields::from([("formLink", "https://forms.example/a")]);
        assert_eq!(
            build_task_details(TaskType::Form, &fields, false).unwrap(),
            TaskDetails::Form
        );
    }

    #[test]
    fn test_project_details_lists() {
        let fields = FormFields::from([
            ("requirements", "Use Rust"),
            ("deliverables", "code, report"),
            ("evaluationCriteria", "design,testing"),
        ]);
        let TaskDetails::Project(details) =
            build_task_details(TaskType::Project, &fields, false).unwrap()
        else {
            panic!("expected project details");
        };
        assert_eq!(details.requirements.as_deref(), Some("Use Rust"));
        assert_eq!(details.deliverables, vec!["code", "report"]);
        assert_eq!(details.evaluation_criteria, vec!["design", "testing"]);
    }

    #[test]
    fn test_quiz_details_reject_non_numeric() {
        let fields = FormFields::from([("totalQuestions", "ten")]);
        assert!(build_task_details(TaskType::Quiz, &fields, false).is_err());

        let fields = FormFields::from([("totalQuestions", "10"), ("quizLink", "https://q.example")]);
        let TaskDetails::Quiz(details) = build_task_details(TaskType::Quiz, &fields, false).unwrap()
        else {
            panic!("expected quiz details");
        };
        assert_eq!(details.total_questions, Some(10));
        assert_eq!(details.passing_score, None);
    }

    #[test]
    fn test_quiz_submission_needs_integer_score() {
        assert!(build_submission_payload(TaskType::Quiz, &FormFields::default(), false).is_err());
        let bad = FormFields::from([("quizScore", "8.5")]);
        assert!(build_submission_payload(TaskType::Quiz, &bad, false).is_err());
        let ok = FormFields::from([("quizScore", "8")]);
        assert_eq!(
            build_submission_payload(TaskType::Quiz, &ok, false).unwrap(),
            SubmissionPayload::Quiz(QuizSubmission { quiz_score: 8 })
        );
    }

    #[test]
    fn test_form_response_json_or_string() {
        let json = FormFields::from([("formResponse", r#"{"q1": "yes"}"#)]);
        let SubmissionPayload::Form(form) =
            build_submission_payload(TaskType::Form, &json, false).unwrap()
        else {
            panic!("expected form payload");
        };
        assert_eq!(form.form_response["q1"], "yes");

        let text = FormFields::from([("formResponse", "plain answer")]);
        let SubmissionPayload::Form(form) =
            build_submission_payload(TaskType::Form, &text, false).unwrap()
        else {
            panic!("expected form payload");
        };
        assert_eq!(form.form_response, serde_json::Value::String("plain answer".into()));
    }

    #[test]
    fn test_project_submission_deliverables() {
        let fields = FormFields::from([("deliverables", "repo,video"), ("demoLink", "https://demo")]);
        let SubmissionPayload::Project(p) =
            build_submission_payload(TaskType::Project, &fields, false).unwrap()
        else {
            panic!("expected project payload");
        };
        assert_eq!(p.deliverables, vec!["repo", "video"]);
        assert_eq!(p.demo_link.as_deref(), Some("https://demo"));
        assert_eq!(p.documentation, None);
    }
}
