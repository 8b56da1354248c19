use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，无法判断键是否存在
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;

    /// ttl 为 0 时使用默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);

    async fn remove(&self, key: &str);

    async fn invalidate_all(&self);
}

/// 基于 JSON 的类型化读写
#[async_trait]
pub trait ObjectCacheExt {
    async fn get_json<T: DeserializeOwned + Send>(&self, key: &str) -> CacheResult<T>;

    async fn insert_json<T: Serialize + Sync>(&self, key: String, value: &T, ttl: u64);
}

#[async_trait]
impl<C: ObjectCache + ?Sized> ObjectCacheExt for C {
    async fn get_json<T: DeserializeOwned + Send>(&self, key: &str) -> CacheResult<T> {
        match self.get_raw(key).await {
            CacheResult::Found(json) => match serde_json::from_str::<T>(&json) {
                Ok(value) => CacheResult::Found(value),
                Err(e) => {
                    // 结构变更后的旧数据直接丢弃
                    tracing::debug!("Dropping undecodable cache entry '{}': {}", key, e);
                    self.remove(key).await;
                    CacheResult::NotFound
                }
            },
            CacheResult::NotFound => CacheResult::NotFound,
            CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
        }
    }

    async fn insert_json<T: Serialize + Sync>(&self, key: String, value: &T, ttl: u64) {
        match serde_json::to_string(value) {
            Ok(json) => self.insert_raw(key, json, ttl).await,
            Err(e) => tracing::error!("Failed to serialize cache entry '{}': {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapCache(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl ObjectCache for MapCache {
        async fn get_raw(&self, key: &str) -> CacheResult<String> {
            match self.0.lock().unwrap().get(key) {
                Some(v) => CacheResult::Found(v.clone()),
                None => CacheResult::NotFound,
            }
        }

        async fn insert_raw(&self, key: String, value: String, _ttl: u64) {
            self.0.lock().unwrap().insert(key, value);
        }

        async fn remove(&self, key: &str) {
            self.0.lock().unwrap().remove(key);
        }

        async fn invalidate_all(&self) {
            self.0.lock().unwrap().clear();
        }
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let cache = MapCache::default();
        cache.insert_json("k".into(), &vec![1, 2, 3], 0).await;
        assert_eq!(cache.get_json::<Vec<i32>>("k").await, CacheResult::Found(vec![1, 2, 3]));
        assert_eq!(cache.get_json::<Vec<i32>>("missing").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_removed() {
        let cache = MapCache::default();
        cache.insert_raw("k".into(), "not json".into(), 0).await;
        assert_eq!(cache.get_json::<Vec<i32>>("k").await, CacheResult::NotFound);
        assert_eq!(cache.get_raw("k").await, CacheResult::NotFound);
    }
}
