use std::fmt;

use serde::Deserialize;

// =========================================================
// 错误状态枚举
// =========================================================

/// 客户端错误的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorStatus {
    /// 网络不可达、连接被拒绝等传输层失败
    Network,
    /// 超过客户端固定超时
    Timeout,
    /// 401/403: 凭据缺失或失效
    Unauthorized,
    /// 404: 资源不存在
    NotFound,
    /// 其余 4xx: 后端拒绝了请求（含登录失败的 400）
    Rejected,
    /// 5xx: 后端内部错误
    Server,
    /// JSON 编解码失败
    Serialization,
    /// 本地持久化读写失败
    Storage,
}

impl ClientErrorStatus {
    /// 按 HTTP 状态码归类
    pub fn from_http(status: u16) -> Self {
        match status {
            401 | 403 => ClientErrorStatus::Unauthorized,
            404 => ClientErrorStatus::NotFound,
            400..=499 => ClientErrorStatus::Rejected,
            _ => ClientErrorStatus::Server,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ClientErrorStatus::Network => "NETWORK_ERROR",
            ClientErrorStatus::Timeout => "TIMEOUT",
            ClientErrorStatus::Unauthorized => "UNAUTHORIZED",
            ClientErrorStatus::NotFound => "RESOURCE_NOT_FOUND",
            ClientErrorStatus::Rejected => "REQUEST_REJECTED",
            ClientErrorStatus::Server => "SERVER_ERROR",
            ClientErrorStatus::Serialization => "JSON_PARSE_ERROR",
            ClientErrorStatus::Storage => "STORAGE_ERROR",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端统一错误
///
/// - status: 错误类型/语义
/// - message: 错误消息（后端返回 `detail` 时优先使用）
/// - http_status: 原始 HTTP 状态码（仅对后端响应错误存在）
/// - source: 原始错误（可选，用于错误链）
/// - spans: 发生错误时所在的操作链
#[derive(Debug)]
pub struct ClientError {
    pub status: ClientErrorStatus,
    pub message: String,
    http_status: Option<u16>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<String>,
}

/// FastAPI 风格的错误响应体
#[derive(Deserialize)]
struct DetailBody {
    detail: serde_json::Value,
}

impl ClientError {
    pub fn new(status: ClientErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            http_status: None,
            source: None,
            spans: Vec::new(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Timeout, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Serialization, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Storage, message)
    }

    /// 由非 2xx 响应构造错误
    ///
    /// 响应体为 `{"detail": ...}` 时取其内容作为消息，否则使用原始文本。
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<DetailBody>(body) {
            Ok(DetailBody {
                detail: serde_json::Value::String(s),
            }) => s,
            Ok(DetailBody { detail }) => detail.to_string(),
            Err(_) if body.trim().is_empty() => format!("HTTP {}", status),
            Err(_) => body.trim().to_string(),
        };
        let mut err = Self::new(ClientErrorStatus::from_http(status), message);
        err.http_status = Some(status);
        err
    }

    /// 添加操作追踪
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(operation.into());
        self
    }

    /// 设置原始错误源
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[String] {
        &self.spans
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;
        if !self.spans.is_empty() {
            write!(f, " | trace: {}", self.spans.join(" -> "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::serialization(e.to_string()).with_source(e)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        let status = if e.is_timeout() {
            ClientErrorStatus::Timeout
        } else if e.is_decode() {
            ClientErrorStatus::Serialization
        } else {
            ClientErrorStatus::Network
        };
        ClientError::new(status, e.to_string()).with_source(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ClientErrorStatus::from_http(401), ClientErrorStatus::Unauthorized);
        assert_eq!(ClientErrorStatus::from_http(403), ClientErrorStatus::Unauthorized);
        assert_eq!(ClientErrorStatus::from_http(404), ClientErrorStatus::NotFound);
        assert_eq!(ClientErrorStatus::from_http(400), ClientErrorStatus::Rejected);
        assert_eq!(ClientErrorStatus::from_http(422), ClientErrorStatus::Rejected);
        assert_eq!(ClientErrorStatus::from_http(500), ClientErrorStatus::Server);
        assert_eq!(ClientErrorStatus::from_http(502), ClientErrorStatus::Server);
    }

    #[test]
    fn test_from_response_extracts_detail() {
        let err = ClientError::from_response(400, r#"{"detail":"Incorrect username or password"}"#);
        assert_eq!(err.status, ClientErrorStatus::Rejected);
        assert_eq!(err.message(), "Incorrect username or password");
        assert_eq!(err.http_status(), Some(400));

        // FastAPI 校验错误的 detail 是数组
        let err = ClientError::from_response(422, r#"{"detail":[{"msg":"field required"}]}"#);
        assert!(err.message().contains("field required"));
    }

    #[test]
    fn test_from_response_plain_and_empty_bodies() {
        let err = ClientError::from_response(502, "Bad Gateway\n");
        assert_eq!(err.message(), "Bad Gateway");
        assert_eq!(err.status, ClientErrorStatus::Server);

        let err = ClientError::from_response(404, "");
        assert_eq!(err.message(), "HTTP 404");
    }

    #[test]
    fn test_display_includes_trace() {
        let err = ClientError::network("connection refused")
            .in_op("history.list")
            .in_op("dashboard.load");
        assert_eq!(
            err.to_string(),
            "[NETWORK_ERROR] connection refused | trace: history.list -> dashboard.load"
        );
    }

    #[test]
    fn test_serde_error_converts() {
        let parse: Result<u32, _> = serde_json::from_str("nope");
        let err: ClientError = parse.unwrap_err().into();
        assert_eq!(err.status, ClientErrorStatus::Serialization);
        assert!(std::error::Error::source(&err).is_some());
    }
}
