use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// 解析截止时间
///
/// 支持 RFC 3339、`YYYY-MM-DDTHH:MM`（`datetime-local` 表单格式）与 `YYYY-MM-DD`，
/// 无时区信息时按 UTC 处理，仅日期时取当天 23:59:59。
pub fn parse_deadline(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_deadline("2025-03-01T10:30:00+05:30").unwrap();
        assert_eq!(dt.hour(), 5);
        assert_eq!(dt.minute(), 0);
    }

    #[test]
    fn test_parse_datetime_local() {
        let dt = parse_deadline("2025-03-01T10:30").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (10, 30));
    }

    #[test]
    fn test_parse_date_only_is_end_of_day() {
        let dt = parse_deadline("2025-03-01").unwrap();
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (23, 59, 59));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_deadline("").is_none());
        assert!(parse_deadline("next friday").is_none());
    }
}
