//! CropVision 客户端核心
//!
//! 与平台无关的客户端逻辑：
//! - `api`: 后端 REST 接口访问（预测、历史、统计、认证）
//! - `auth`: 会话状态机与持久化
//! - `settings`: 偏好设置存储与主题应用
//! - `router`: 导航守卫
//!
//! 浏览器相关的实现（fetch、localStorage、DOM）由前端 crate 通过
//! `HttpClient` / `KeyValueStore` / `ThemeApplier` 注入。

// =========================================================
// 跨平台日志宏
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (println!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (web_sys::console::warn_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (eprintln!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (eprintln!($($t)*))
}

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod request;
pub mod router;
pub mod settings;
pub mod storage;

pub use api::ApiClient;
pub use auth::{AuthState, AuthStore, Session};
pub use config::ApiConfig;
pub use error::{ClientError, ClientErrorStatus, ClientResult};
pub use request::{HttpClient, HttpRequest, HttpResponse, RequestBody};
pub use router::{Navigation, SessionAccessor, guard};
pub use settings::{SettingsStore, ThemeApplier};
pub use storage::{KeyValueStore, MemoryStore};

#[cfg(not(target_arch = "wasm32"))]
pub use request::ReqwestHttpClient;
