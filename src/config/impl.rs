use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

// 常用的非前缀环境变量 -> 配置键
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("JWT_SECRET", "jwt.secret"),
    ("DATABASE_URL", "database.url"),
    ("CACHE_TYPE", "cache.type"),
    ("REDIS_URL", "cache.redis.url"),
    ("REDIS_KEY_PREFIX", "cache.redis.key_prefix"),
    ("REDIS_TTL", "cache.default_ttl"),
    ("UPLOAD_DIR", "upload.dir"),
    ("IMPORT_EMAIL_DOMAIN", "import.email_domain"),
    ("IMPORT_DEFAULT_PASSWORD", "import.default_password"),
];

impl AppConfig {
    /// 加载配置
    ///
    /// 顺序：`config.toml` -> `config.{APP_ENV}.toml` -> `CAMPUSFLOW_*` -> 常用环境变量。
    pub fn load() -> Result<Self, ConfigError> {
        let env_name = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{env_name}")).required(false))
            .add_source(
                Environment::with_prefix("CAMPUSFLOW")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;

        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        app_config.validate()?;
        Ok(app_config)
    }

    /// 拒绝会导致运行期异常的配置
    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if self.jwt.access_token_expiry <= 0 {
            return Err(ConfigError::Message(
                "jwt.access_token_expiry must be positive".into(),
            ));
        }
        if self.upload.dir.trim().is_empty() || self.upload.max_size == 0 {
            return Err(ConfigError::Message(
                "upload.dir and upload.max_size must be set".into(),
            ));
        }
        if self.import.max_rows == 0 {
            return Err(ConfigError::Message("import.max_rows must be positive".into()));
        }
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Unix 套接字路径，未配置时为 None
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_is_valid() {
        let config = AppConfig::get();
        assert!(config.validate().is_ok());
        assert!(config.server.workers >= 1);
        assert_eq!(config.import.email_domain, "campusflow.in");
    }

    #[test]
    fn test_validate_rejects_empty_secret() {
        let mut config = AppConfig::get().clone();
        config.jwt.secret = "  ".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::get().clone();
        config.import.max_rows = 0;
        assert!(config.validate().is_err());
    }
}
