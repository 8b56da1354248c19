use crate::cache::ObjectCache;
use crate::cache::register::{find_cache_backend, log_registered_cache_backends};
use crate::config::AppConfig;
use crate::models::users::requests::NewAdmin;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_initial_password;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// 初始化日志：开发环境带文件行号，其他环境输出 JSON
///
/// 返回的 guard 必须存活到进程退出，否则缓冲中的日志会丢失。
pub fn init_tracing(config: &AppConfig) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.app.log_level))
        .with_writer(writer)
        .with_level(true)
        .with_ansi(config.is_development());

    if config.is_development() {
        builder.with_file(true).with_line_number(true).init();
    } else {
        builder.json().init();
    }
    guard
}

/// 默认管理员邮箱
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@campusflow.in";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 按名称构造缓存后端
async fn build_cache(cache_type: &str) -> Option<Arc<dyn ObjectCache>> {
    let Some(factory) = find_cache_backend(cache_type) else {
        warn!("Cache backend '{}' not found in registry", cache_type);
        return None;
    };

    match factory().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", cache_type, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();
    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = build_cache(cache_type).await {
        return Ok(cache);
    }

    if cache_type != "moka" {
        warn!("Falling back to Moka (in-memory) cache");
        if let Some(cache) = build_cache("moka").await {
            return Ok(cache);
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 管理员表为空时创建默认管理员
pub async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_admins().await {
        Ok(count) if count > 0 => {
            debug!("Database already has {} admin(s), skipping seed", count);
            return;
        }
        Ok(_) => info!("No admin found in database, creating default admin account..."),
        Err(e) => {
            warn!("Failed to count admins: {}, skipping admin seed", e);
            return;
        }
    }

    let password = std::env::var("ADMIN_PASSWORD")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| {
            let pwd = generate_initial_password();
            warn!("==========================================================");
            warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
            warn!("  Admin email: {}", DEFAULT_ADMIN_EMAIL);
            warn!("  Generated admin password: {}", pwd);
            warn!("  Please save this password or set ADMIN_PASSWORD env var");
            warn!("==========================================================");
            pwd
        });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin = NewAdmin {
        name: "Administrator".to_string(),
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        department: "Administration".to_string(),
        password_hash,
    };

    match storage.create_admin(admin).await {
        Ok(admin) => info!(
            "Default admin account created (ID: {}, email: {})",
            admin.id, admin.email
        ),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// 准备服务器启动的上下文
/// 包括存储、默认管理员与缓存
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        log_registered_cache_backends();
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let upload_dir = &AppConfig::get().upload.dir;
    if let Err(e) = tokio::fs::create_dir_all(upload_dir).await {
        warn!("Failed to create upload directory {}: {}", upload_dir, e);
    }

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    StartupContext { storage, cache }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::memory_storage;

    #[tokio::test]
    async fn test_seed_admin_runs_once() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);

        seed_admin(&storage).await;

    let upload_dir = &AppConfig::get().upload.dir;
    if let Err(e) = tokio::fs::create_dir_all(upload_dir).await {
        warn!("Failed to create upload directory {}: {}", upload_dir, e);
    }
        seed_admin(&storage).await;

    let upload_dir = &AppConfig::get().upload.dir;
    if let Err(e) = tokio::fs::create_dir_all(upload_dir).await {
        warn!("Failed to create upload directory {}: {}", upload_dir, e);
    }

        assert_eq!(storage.count_admins().await.unwrap(), 1);
        let admin = storage
            .get_admin_by_email(DEFAULT_ADMIN_EMAIL)
            .await
            .unwrap()
            .expect("seeded admin");
        assert_eq!(admin.name, "Administrator");
    }
}
