//! 后端 REST API 访问层
//!
//! `ApiClient` 持有唯一一份请求配置（基础路径、超时、Bearer 令牌），
//! 各功能模块通过 `predict()` / `history()` / `stats()` / `auth()` 访问，
//! 每个函数对应一次 HTTP 调用。本层不做本地校验，也不重试。

use cropvision_shared::HEADER_AUTHORIZATION;
use cropvision_shared::protocol::ApiRequest;

use crate::config::ApiConfig;
use crate::error::ClientResult;
use crate::request::{HttpClient, HttpRequest};

mod auth;
mod history;
mod predict;
mod stats;

pub use auth::AuthApi;
pub use history::HistoryApi;
pub use predict::PredictApi;
pub use stats::StatsApi;

#[derive(Clone, Debug)]
pub struct ApiClient<C: HttpClient> {
    client: C,
    config: ApiConfig,
    token: Option<String>,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(client: C, config: ApiConfig) -> Self {
        Self {
            client,
            config,
            token: None,
        }
    }

    /// 附带 Bearer 令牌（None 表示匿名请求）
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn http_client(&self) -> &C {
        &self.client
    }

    pub fn predict(&self) -> PredictApi<'_, C> {
        PredictApi { api: self }
    }

    pub fn history(&self) -> HistoryApi<'_, C> {
        HistoryApi { api: self }
    }

    pub fn stats(&self) -> StatsApi<'_, C> {
        StatsApi { api: self }
    }

    pub fn auth(&self) -> AuthApi<'_, C> {
        AuthApi { api: self }
    }

    /// 按端点元数据构造请求：URL、方法、查询串、超时与认证头
    fn request_for<R: ApiRequest>(&self, req: &R) -> HttpRequest {
        let mut http = HttpRequest::new(&self.config.url(&req.path()), R::METHOD)
            .with_query(req.query())
            .with_timeout(self.config.timeout);
        if let Some(token) = &self.token {
            http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }
        http
    }

    /// 发送请求并解析为端点声明的响应类型
    async fn execute<R: ApiRequest>(&self, http: HttpRequest, op: &str) -> ClientResult<R::Response> {
        let resp = self
            .client
            .send(http)
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| e.in_op(op.to_string()))?;
        resp.json::<R::Response>().map_err(|e| e.in_op(op.to_string()))
    }
}
