use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?\d|2[0-3]):([0-5]\d)$").expect("Invalid time regex"));

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 规范化 `H:MM` / `HH:MM` 为 `HH:MM`
pub fn normalize_time_of_day(input: &str) -> Option<String> {
    let caps = TIME_RE.captures(input.trim())?;
    let hour: u32 = caps[1].parse().ok()?;
    Some(format!("{hour:02}:{}", &caps[2]))
}

/// 星期名规范为首字母大写的英文全称，支持三字母缩写
pub fn normalize_weekday(input: &str) -> Option<&'static str> {
    let input = input.trim();
    if input.len() < 3 {
        return None;
    }
    WEEKDAYS.iter().copied().find(|day| {
        day.eq_ignore_ascii_case(input)
            || (input.len() == 3 && day[..3].eq_ignore_ascii_case(input))
    })
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

/// 初始密码策略：至少 8 位，同时包含大小写字母和数字
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("priya.sharma@campusflow.in").is_ok());
        assert!(validate_email("no-at-sign.campusflow.in").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_time_of_day() {
        assert_eq!(normalize_time_of_day("9:05").as_deref(), Some("09:05"));
        assert_eq!(normalize_time_of_day(" 14:30 ").as_deref(), Some("14:30"));
        assert!(normalize_time_of_day("24:00").is_none());
        assert!(normalize_time_of_day("9.30").is_none());
    }

    #[test]
    fn test_weekday() {
        assert_eq!(normalize_weekday("monday"), Some("Monday"));
        assert_eq!(normalize_weekday("FRI"), Some("Friday"));
        assert!(normalize_weekday("Mo").is_none());
        assert!(normalize_weekday("Funday").is_none());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("Welcome123!").is_valid);
        let weak = validate_password("abc");
        assert!(!weak.is_valid);
        assert!(
            weak.errors
                .contains(&"Password must be at least 8 characters long")
        );
        assert_eq!(weak.errors.len(), 3);
    }
}
