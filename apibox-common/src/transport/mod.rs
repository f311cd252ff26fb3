//! 传输层抽象
//!
//! 客户端只依赖 [`Transport`]：给定构建好的请求，返回响应或失败。
//! 连接复用、重定向、超时的执行都由具体实现负责。

mod reqwest_transport;

use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{ApiError, Result};
use crate::request::PreparedRequest;

pub use reqwest_transport::ReqwestTransport;

/// 执行 HTTP 请求的协作者
#[async_trait]
pub trait Transport: Send + Sync {
    /// 发送请求
    ///
    /// 任何失败都以 `anyhow::Error` 返回，由客户端统一包装为 `ApiError::Transport`。
    async fn perform(&self, request: &PreparedRequest) -> anyhow::Result<Response>;
}

/// HTTP 响应
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub content: Bytes,
    /// 键为小写的响应头，重复出现的头以 `, ` 连接
    pub headers: BTreeMap<String, String>,
    pub url: String,
}

impl Response {
    pub fn new(status: u16, content: impl Into<Bytes>) -> Self {
        Self {
            status,
            content: content.into(),
            headers: BTreeMap::new(),
            url: String::new(),
        }
    }

    pub fn with_header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.insert(key.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 忽略大小写读取响应头
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    /// 将响应体解析为 JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.content).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// 响应体前 `limit` 个字节，用于日志
    pub fn preview(&self, limit: usize) -> String {
        let end = self.content.len().min(limit);
        String::from_utf8_lossy(&self.content[..end]).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_helpers() {
        let response = Response::new(200, r#"{"url":"http://httpbin.org/get"}"#)
            .with_header("Content-Type", "application/json");

        assert!(response.is_success());
        assert_eq!(response.header("content-type"), Some("application/json"));
        let body: serde_json::Value = response.json().unwrap();
        assert_eq!(body["url"], "http://httpbin.org/get");
        assert_eq!(response.preview(7), r#"{"url":"#);
    }

    #[test]
    fn test_response_json_decode_error() {
        let response = Response::new(500, "oops");
        assert!(!response.is_success());
        let result = response.json::<serde_json::Value>();
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
