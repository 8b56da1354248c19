//! 批量导入时的账号凭据生成

/// 由姓名生成登录邮箱：各段小写后以 `.` 连接
///
/// `"Priya  Sharma"` + `campusflow.in` → `priya.sharma@campusflow.in`
pub fn generate_email(full_name: &str, domain: &str) -> Option<String> {
    let local = full_name
        .split_whitespace()
        .map(|part| {
            part.chars()
                .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_'))
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".");

    if local.is_empty() {
        return None;
    }
    Some(format!("{local}@{}", domain.trim_start_matches('@')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_email_joins_lowercased_parts() {
        assert_eq!(
            generate_email("Priya  Sharma", "campusflow.in").as_deref(),
            Some("priya.sharma@campusflow.in")
        );
        assert_eq!(
            generate_email("  Rahul K. Menon ", "@school.edu").as_deref(),
            Some("rahul.k.menon@school.edu")
        );
    }

    #[test]
    fn test_generate_email_rejects_blank_name() {
        assert!(generate_email("   ", "campusflow.in").is_none());
        assert!(generate_email("!!!", "campusflow.in").is_none());
    }
}
