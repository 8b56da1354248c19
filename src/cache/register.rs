//! 缓存后端注册表
//!
//! 各后端通过 `declare_object_cache_plugin!` 在进程启动时登记构造函数，
//! 启动流程再按 `cache.type` 取出。

use crate::cache::traits::ObjectCache;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

pub type CacheFuture = Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type CacheFactory = Arc<dyn Fn() -> CacheFuture + Send + Sync>;

// BTreeMap 让列出的后端名称有序
static CACHE_BACKENDS: Lazy<RwLock<BTreeMap<String, CacheFactory>>> =
    Lazy::new(|| RwLock::new(BTreeMap::new()));

/// 登记后端，同名后登记者覆盖先前的
pub fn register_cache_backend(name: impl Into<String>, factory: CacheFactory) {
    if let Ok(mut backends) = CACHE_BACKENDS.write() {
        backends.insert(name.into(), factory);
    }
}

pub fn find_cache_backend(name: &str) -> Option<CacheFactory> {
    CACHE_BACKENDS
        .read()
        .ok()
        .and_then(|backends| backends.get(name).cloned())
}

/// 已登记的后端名称
pub fn registered_cache_backends() -> Vec<String> {
    CACHE_BACKENDS
        .read()
        .map(|backends| backends.keys().cloned().collect())
        .unwrap_or_default()
}

pub fn log_registered_cache_backends() {
    let names = registered_cache_backends();
    if names.is_empty() {
        tracing::debug!("No cache backend registered");
    } else {
        tracing::debug!("Registered cache backends: {}", names.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_backends_are_registered() {
        let names = registered_cache_backends();
        assert!(names.contains(&"moka".to_string()));
        assert!(names.contains(&"redis".to_string()));
        assert!(find_cache_backend("memcached").is_none());
    }

    #[tokio::test]
    async fn test_moka_factory_builds_cache() {
        let factory = find_cache_backend("moka").expect("moka registered");
        let cache = factory().await.expect("moka cache");
        cache
            .insert_raw("user:t".to_string(), "{}".to_string(), 0)
            .await;
        assert_eq!(
            cache.get_raw("user:t").await,
            crate::cache::CacheResult::Found("{}".to_string())
        );
    }
}
