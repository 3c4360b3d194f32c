use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

pub use cropvision_shared::protocol::HttpMethod;

#[cfg(test)]
use std::cell::RefCell;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// multipart 上传的单个文件
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    /// 浏览器无法识别的文件类型为空串，按二进制流发送
    pub fn mime(&self) -> &str {
        if self.content_type.trim().is_empty() {
            "application/octet-stream"
        } else {
            &self.content_type
        }
    }
}

/// 请求体
///
/// 具体编码交给各传输实现：reqwest 与浏览器 fetch 各自构造表单与 multipart。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(String),
    /// application/x-www-form-urlencoded
    Form(Vec<(String, String)>),
    Multipart(FilePart),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            query: Vec::new(),
            body: RequestBody::Empty,
            timeout: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn with_json<T: Serialize>(mut self, body: &T) -> ClientResult<Self> {
        self.body = RequestBody::Json(serde_json::to_string(body)?);
        Ok(self)
    }

    pub fn with_form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    pub fn with_file(mut self, part: FilePart) -> Self {
        self.body = RequestBody::Multipart(part);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// 非 2xx 时转换为错误，否则原样返回
    pub fn error_for_status(self) -> ClientResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::from_response(self.status, &self.body))
        }
    }
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为浏览器环境下 fetch 返回的 future 不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse>;
}

// =========================================================
// 实现层: reqwest 客户端 (Native)
// =========================================================

#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in &req.headers {
            builder = builder.header(k, v);
        }
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(timeout) = req.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match req.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder
                .header("Content-Type", "application/json")
                .body(body),
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Multipart(part) => {
                let mime = part.mime().to_string();
                let file = reqwest::multipart::Part::bytes(part.bytes)
                    .file_name(part.file_name)
                    .mime_str(&mime)?;
                builder.multipart(reqwest::multipart::Form::new().part(part.field, file))
            }
        };

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub struct MockHttpClient {
    // (Method, URL) -> (Status, Response Body)
    responses: RefCell<HashMap<(String, String), (u16, String)>>,
    /// 按顺序记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
    failure: RefCell<Option<crate::error::ClientErrorStatus>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
            failure: RefCell::new(None),
        }
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.responses.borrow_mut().insert(
            (method.as_str().to_string(), url.to_string()),
            (status, body.to_string()),
        );
    }

    /// 让后续所有请求在传输层失败
    pub fn fail_with(&self, status: crate::error::ClientErrorStatus) {
        *self.failure.borrow_mut() = Some(status);
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let key = (req.method.as_str().to_string(), req.url.clone());
        self.requests.borrow_mut().push(req);

        if let Some(status) = *self.failure.borrow() {
            return Err(ClientError::new(status, "simulated transport failure"));
        }

        let responses = self.responses.borrow();
        if let Some((status, body)) = responses.get(&key) {
            Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            })
        } else {
            Ok(HttpResponse {
                status: 404,
                body: r#"{"detail":"Not Found"}"#.to_string(),
            })
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::error::ClientErrorStatus;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// 读取完整请求：头部之后按 Content-Length 读取请求体
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    /// 启动一个只应答一次的本地 HTTP 服务，返回地址与收到的原始请求
    async fn serve_once(
        response: &'static str,
        delay: Duration,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let raw = read_request(&mut socket).await;
            tokio::time::sleep(delay).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
            raw
        });
        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_response_status_helpers() {
        let ok = HttpResponse {
            status: 204,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(ok.error_for_status().is_ok());

        let bad = HttpResponse {
            status: 401,
            body: r#"{"detail":"Not authenticated"}"#.to_string(),
        };
        let err = bad.error_for_status().unwrap_err();
        assert_eq!(err.status, ClientErrorStatus::Unauthorized);
        assert_eq!(err.message(), "Not authenticated");
    }

    #[tokio::test]
    async fn test_reqwest_client_sends_query_headers_and_reads_body() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n[]",
            Duration::ZERO,
        )
        .await;

        let client = ReqwestHttpClient::new();
        let req = HttpRequest::new(&format!("{}/api/history", base), HttpMethod::Get)
            .with_header("Authorization", "Bearer t0k")
            .with_query(vec![("limit".to_string(), "5".to_string())])
            .with_timeout(Duration::from_secs(5));
        let resp = client.send(req).await.unwrap();

        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, "[]");

        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /api/history?limit=5 HTTP/1.1"));
        assert!(raw.to_lowercase().contains("authorization: bearer t0k"));
    }

    #[tokio::test]
    async fn test_reqwest_client_encodes_form_body() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            Duration::ZERO,
        )
        .await;

        let req = HttpRequest::new(&format!("{}/api/auth/token", base), HttpMethod::Post)
            .with_form(vec![
                ("username".to_string(), "alice".to_string()),
                ("password".to_string(), "p@ss".to_string()),
            ]);
        ReqwestHttpClient::new().send(req).await.unwrap();

        let raw = server.await.unwrap();
        assert!(
            raw.to_lowercase()
                .contains("content-type: application/x-www-form-urlencoded")
        );
        assert!(raw.ends_with("username=alice&password=p%40ss"));
    }

    #[tokio::test]
    async fn test_reqwest_client_sends_untyped_file_as_octet_stream() {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            Duration::ZERO,
        )
        .await;

        let part = FilePart {
            field: "file".to_string(),
            file_name: "leaf.heic".to_string(),
            content_type: String::new(),
            bytes: vec![1, 2, 3],
        };
        assert_eq!(part.mime(), "application/octet-stream");

        let req = HttpRequest::new(&format!("{}/api/predict", base), HttpMethod::Post)
            .with_file(part);
        let resp = ReqwestHttpClient::new().send(req).await.unwrap();
        assert_eq!(resp.status, 200);

        let raw = server.await.unwrap().to_lowercase();
        assert!(raw.starts_with("post /api/predict http/1.1"));
        assert!(raw.contains("multipart/form-data"));
        assert!(raw.contains(r#"name="file"; filename="leaf.heic""#));
        assert!(raw.contains("content-type: application/octet-stream"));
    }

    #[test]
    fn test_typed_file_keeps_its_mime() {
        let part = FilePart {
            field: "file".to_string(),
            file_name: "leaf.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: Vec::new(),
        };
        assert_eq!(part.mime(), "image/png");
    }

    #[tokio::test]
    async fn test_reqwest_client_reports_timeout() {
        let (base, _server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n",
            Duration::from_secs(5),
        )
        .await;

        let req = HttpRequest::new(&format!("{}/api/stats", base), HttpMethod::Get)
            .with_timeout(Duration::from_millis(100));
        let err = ReqwestHttpClient::new().send(req).await.unwrap_err();
        assert_eq!(err.status, ClientErrorStatus::Timeout);
    }

    #[tokio::test]
    async fn test_reqwest_client_reports_connection_failure() {
        // 绑定后立即释放端口，连接将被拒绝
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let req = HttpRequest::new(&format!("http://{}/api/stats", addr), HttpMethod::Get);
        let err = ReqwestHttpClient::new().send(req).await.unwrap_err();
        assert_eq!(err.status, ClientErrorStatus::Network);
    }
}
