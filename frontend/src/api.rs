//! API 客户端装配
//!
//! 浏览器端的 `ApiClient` 使用 fetch 传输，配置在构建期通过环境变量覆盖。

use cropvision::api::ApiClient;
use cropvision::config::{ApiConfig, ENV_API_BASE, ENV_API_TIMEOUT_MS};
use cropvision::error::ClientError;

use crate::web::FetchHttpClient;

pub type CropVisionApi = ApiClient<FetchHttpClient>;

/// 构建期配置（`CROPVISION_API_BASE` / `CROPVISION_API_TIMEOUT_MS`）
pub fn api_config() -> ApiConfig {
    ApiConfig::from_lookup(|name| match name {
        ENV_API_BASE => option_env!("CROPVISION_API_BASE").map(str::to_string),
        ENV_API_TIMEOUT_MS => option_env!("CROPVISION_API_TIMEOUT_MS").map(str::to_string),
        _ => None,
    })
}

pub fn api_client(token: Option<String>) -> CropVisionApi {
    ApiClient::new(FetchHttpClient, api_config()).with_token(token)
}

/// 记录失败的 API 调用并返回面向用户的提示
pub fn describe_error(action: &str, err: &ClientError) -> String {
    web_sys::console::error_1(&format!("[Api] {} failed: {}", action, err).into());
    format!("{}失败: {}", action, err.message())
}
