//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 实现核心库的 [`KeyValueStore`]，替代 `gloo-storage`。

use cropvision::error::{ClientError, ClientResult};
use cropvision::storage::KeyValueStore;

/// 浏览器 LocalStorage
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    fn require() -> ClientResult<web_sys::Storage> {
        Self::storage().ok_or_else(|| ClientError::storage("localStorage 不可用"))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        Self::require()?
            .set_item(key, value)
            .map_err(|e| ClientError::storage(format!("写入 {} 失败: {:?}", key, e)))
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        Self::require()?
            .remove_item(key)
            .map_err(|e| ClientError::storage(format!("删除 {} 失败: {:?}", key, e)))
    }
}
