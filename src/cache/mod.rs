//! 对象缓存层
//!
//! 后端通过插件注册表按名称选择（`moka` / `redis`），未找到时回退到 Moka。

pub mod object_cache;
pub mod register;
mod traits;

pub use traits::{CacheResult, ObjectCache, ObjectCacheExt};

/// 声明一个对象缓存插件，进程启动时自动注册到插件表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[::ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_cache_backend(
                $name,
                ::std::sync::Arc::new(|| {
                    ::std::boxed::Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::CampusFlowError::cache_connection)?;
                        Ok(::std::boxed::Box::new(cache)
                            as ::std::boxed::Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
