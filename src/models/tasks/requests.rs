use std::collections::HashMap;

/// multipart 表单中的文本字段
#[derive(Debug, Clone, Default)]
pub struct FormFields(pub HashMap<String, String>);

impl FormFields {
    /// 非空（去除首尾空白后）的字段值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn get_owned(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FormFields {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// 新建任务（存储层使用）
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub class_id: i64,
    pub teacher_id: i64,
    pub file_url: Option<String>,
    pub form_link: Option<String>,
    pub details: super::entities::TaskDetails,
    pub deadline: chrono::DateTime<chrono::Utc>,
}

/// 写入/覆盖的提交记录（存储层使用）
#[derive(Debug, Clone)]
pub struct SubmissionUpsert {
    pub task_id: i64,
    pub student_id: i64,
    pub status: super::entities::SubmissionStatus,
    pub file_url: Option<String>,
    pub payload: super::entities::SubmissionPayload,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}
