//! HTTP 传输层
//!
//! 使用 `web_sys::fetch` 实现核心库的 [`HttpClient`]，替代 `gloo-net`。
//! 超时通过 `AbortController` + 一次性定时器实现。

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use cropvision::error::{ClientError, ClientResult};
use cropvision::request::{FilePart, HttpClient, HttpRequest, HttpResponse, RequestBody};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AbortController, Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response,
    UrlSearchParams,
};

use super::timer::Timeout;

fn build_error(stage: &str, e: JsValue) -> ClientError {
    ClientError::network(format!("请求构建失败 ({}): {:?}", stage, e))
}

fn search_params(pairs: &[(String, String)]) -> ClientResult<UrlSearchParams> {
    let params = UrlSearchParams::new().map_err(|e| build_error("UrlSearchParams", e))?;
    for (k, v) in pairs {
        params.append(k, v);
    }
    Ok(params)
}

fn multipart_body(part: &FilePart) -> ClientResult<FormData> {
    let bytes = js_sys::Uint8Array::from(part.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let bag = BlobPropertyBag::new();
    bag.set_type(part.mime());
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &bag)
        .map_err(|e| build_error("Blob", e))?;

    let form = FormData::new().map_err(|e| build_error("FormData", e))?;
    form.append_with_blob_and_filename(&part.field, &blob, &part.file_name)
        .map_err(|e| build_error("FormData", e))?;
    Ok(form)
}

/// 定时器毫秒数，超出 u32 范围时饱和而不是回绕
fn timer_millis(timeout: Duration) -> u32 {
    u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX)
}

/// 基于浏览器 fetch 的 HTTP 客户端
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let url = if req.query.is_empty() {
            req.url.clone()
        } else {
            let query: String = search_params(&req.query)?.to_string().into();
            format!("{}?{}", req.url, query)
        };

        let headers = Headers::new().map_err(|e| build_error("Headers", e))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| build_error("Headers", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());

        match &req.body {
            RequestBody::Empty => {}
            RequestBody::Json(body) => {
                headers
                    .set("Content-Type", "application/json")
                    .map_err(|e| build_error("Headers", e))?;
                opts.set_body(&JsValue::from_str(body));
            }
            // URLSearchParams / FormData 作为 body 时由浏览器设置 Content-Type
            RequestBody::Form(fields) => opts.set_body(&search_params(fields)?.into()),
            RequestBody::Multipart(part) => opts.set_body(&multipart_body(part)?.into()),
        }
        opts.set_headers(&headers.into());

        // 超时控制
        let timed_out = Rc::new(Cell::new(false));
        let _timer = match req.timeout {
            Some(timeout) => {
                let controller =
                    AbortController::new().map_err(|e| build_error("AbortController", e))?;
                opts.set_signal(Some(&controller.signal()));
                let timed_out = timed_out.clone();
                Timeout::new(timer_millis(timeout), move || {
                    timed_out.set(true);
                    controller.abort();
                })
            }
            None => None,
        };

        let request =
            Request::new_with_str_and_init(&url, &opts).map_err(|e| build_error("Request", e))?;

        let window =
            web_sys::window().ok_or_else(|| ClientError::network("无法获取 window 对象"))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| {
                if timed_out.get() {
                    ClientError::timeout(format!("请求超时: {}", req.url))
                } else {
                    ClientError::network(format!("网络错误: {:?}", e))
                }
            })?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ClientError::network(format!("Response 类型转换失败: {:?}", e)))?;
        let status = response.status();

        let text_promise = response
            .text()
            .map_err(|e| ClientError::network(format!("读取响应失败: {:?}", e)))?;
        let body = JsFuture::from(text_promise)
            .await
            .map_err(|e| {
                if timed_out.get() {
                    ClientError::timeout(format!("请求超时: {}", req.url))
                } else {
                    ClientError::network(format!("读取响应失败: {:?}", e))
                }
            })?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
