use std::time::Duration;

use cropvision_shared::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_MS};

// =========================================================
// 运行时配置 (Runtime Configuration)
// =========================================================

pub const ENV_API_BASE: &str = "CROPVISION_API_BASE";
pub const ENV_API_TIMEOUT_MS: &str = "CROPVISION_API_TIMEOUT_MS";

/// API 客户端配置：所有请求共享的基础路径与超时
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, timeout }
    }

    /// 通过查找函数读取覆盖项，读不到或非法时使用默认值
    ///
    /// 浏览器端传入编译期常量，原生环境传入进程环境变量。
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup(ENV_API_BASE)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.base_url);

        let timeout = lookup(ENV_API_TIMEOUT_MS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout);

        Self::new(base_url, timeout)
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 拼接完整 URL
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}
