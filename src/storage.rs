//! 键值持久化接口
//!
//! 浏览器端由 `localStorage` 实现，测试与原生环境使用 [`MemoryStore`]。

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{ClientError, ClientResult};

// =========================================================
// 抽象接口定义
// =========================================================

pub trait KeyValueStore {
    /// 读取字符串值，键不存在时返回 None
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;

    /// 读取并反序列化 JSON 值
    ///
    /// 键不存在返回 `Ok(None)`，内容无法解析返回错误。
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> ClientResult<Option<T>> {
        match self.get(key) {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| ClientError::from(e).in_op(format!("storage.get_json({})", key))),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> ClientResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

// =========================================================
// 内存实现
// =========================================================

/// 内存键值存储
///
/// 克隆后共享同一份数据，便于测试中同时持有 store 与检查句柄。
#[derive(Clone, Default)]
pub struct MemoryStore {
    map: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.map
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.map.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientErrorStatus;
    use cropvision_shared::User;

    #[test]
    fn test_memory_store_shares_state_between_clones() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.set("token", "abc").unwrap();
        assert_eq!(handle.get("token").as_deref(), Some("abc"));

        handle.remove("token").unwrap();
        assert!(store.get("token").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_json_helpers() {
        let store = MemoryStore::new();
        assert!(store.get_json::<User>("user").unwrap().is_none());

        store.set_json("user", &User::new("alice")).unwrap();
        assert_eq!(
            store.get("user").as_deref(),
            Some(r#"{"username":"alice","role":"user"}"#)
        );
        let user: User = store.get_json("user").unwrap().unwrap();
        assert_eq!(user.username, "alice");

        store.set("user", "{broken").unwrap();
        let err = store.get_json::<User>("user").unwrap_err();
        assert_eq!(err.status, ClientErrorStatus::Serialization);
        assert_eq!(err.spans(), ["storage.get_json(user)"]);
    }
}
