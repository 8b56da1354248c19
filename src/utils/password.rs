use crate::config::AppConfig;
use crate::errors::CampusFlowError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

/// 哈希密码（Argon2id，参数取自配置）
pub fn hash_password(password: &str) -> Result<String, CampusFlowError> {
    let config = AppConfig::get();
    let params = Params::new(
        config.argon2.memory_cost,
        config.argon2.time_cost,
        config.argon2.parallelism,
        None,
    )
    .map_err(|e| CampusFlowError::validation(format!("Argon2 参数错误: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CampusFlowError::validation(format!("密码哈希失败: {e}")))?;
    Ok(hash.to_string())
}

/// 在阻塞线程池中哈希，避免占用异步工作线程
pub async fn hash_password_blocking(password: String) -> Result<String, CampusFlowError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| CampusFlowError::validation(format!("密码哈希任务失败: {e}")))?
}

/// 验证密码，参数从哈希串中读取
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Welcome123!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Welcome123!", &hash));
        assert!(!verify_password("welcome123!", &hash));
    }

    #[test]
    fn test_salted_hashes_differ() {
        let a = hash_password("Secret99").unwrap();
        let b = hash_password("Secret99").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_malformed_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_hash_on_blocking_pool() {
        let hash = hash_password_blocking("Blocking1".to_string()).await.unwrap();
        assert!(verify_password("Blocking1", &hash));
    }
}
