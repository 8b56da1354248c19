use rand::Rng;
use rand::distr::Alphanumeric;

/// 生成指定长度的随机字母数字串
pub fn generate_random_code(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// 生成满足密码策略的随机初始密码
pub fn generate_initial_password() -> String {
    loop {
        let candidate = generate_random_code(16);
        if crate::utils::validate::validate_password(&candidate).is_valid {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_code_length_and_charset() {
        let code = generate_random_code(24);
        assert_eq!(code.len(), 24);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_initial_password_passes_policy() {
        let password = generate_initial_password();
        assert!(crate::utils::validate::validate_password(&password).is_valid);
    }
}
