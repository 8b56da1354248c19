use serde::Serialize;
use ts_rs::TS;

// 导入生成的账号
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct Credential {
    pub name: String,
    pub email: String,
    pub password: String,
}

// 单个工作表的导入结果，恒有 total == inserted + skipped
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct SheetSummary {
    pub total: i64,
    pub inserted: i64,
    pub skipped: i64,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Vec<Credential>>,
}

impl SheetSummary {
    pub fn with_credentials() -> Self {
        Self {
            credentials: Some(Vec::new()),
            ..Default::default()
        }
    }

    pub fn record_inserted(&mut self, credential: Option<Credential>) {
        self.total += 1;
        self.inserted += 1;
        if let (Some(list), Some(c)) = (self.credentials.as_mut(), credential) {
            list.push(c);
        }
    }

    pub fn record_skipped(&mut self, reason: impl Into<String>) {
        self.total += 1;
        self.skipped += 1;
        self.errors.push(reason.into());
    }
}

// 整个工作簿的导入结果
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct ImportSummary {
    pub students: SheetSummary,
    pub teachers: SheetSummary,
    pub subjects: SheetSummary,
    pub timetable: SheetSummary,
}

// 上传接口的返回数据
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct ImportResponse {
    pub message: String,
    pub summary: ImportSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_stay_balanced() {
        let mut s = SheetSummary::with_credentials();
        s.record_inserted(Some(Credential {
            name: "A".into(),
            email: "a@campusflow.in".into(),
            password: "pw".into(),
        }));
        s.record_skipped("Row 3: duplicate");
        s.record_skipped("Row 4: missing Year");
        assert_eq!(s.total, s.inserted + s.skipped);
        assert_eq!(s.credentials.as_ref().map(Vec::len), Some(1));
        assert_eq!(s.errors.len(), 2);
    }

    #[test]
    fn test_credentials_omitted_for_plain_sheets() {
        let json = serde_json::to_value(SheetSummary::default()).unwrap();
        assert!(json.get("credentials").is_none());
    }
}
