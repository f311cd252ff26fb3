use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::request::PreparedRequest;
use crate::transport::{Response, Transport};

/// 内存中的传输层
///
/// 记录收到的每个请求，并返回预设的响应或失败。
/// 默认返回 200、空响应体，`url` 为请求的完整 URL。
#[derive(Debug, Default)]
pub struct MockTransport {
    response: Option<Response>,
    failure: Option<String>,
    requests: Mutex<Vec<PreparedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 总是返回给定的响应
    pub fn respond_with(response: Response) -> Self {
        Self {
            response: Some(response),
            ..Self::default()
        }
    }

    /// 总是以给定的信息失败
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// 已记录的请求
    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn last_request(&self) -> Option<PreparedRequest> {
        self.requests().pop()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn perform(&self, request: &PreparedRequest) -> anyhow::Result<Response> {
        self.requests
            .lock()
            .map_err(|_| anyhow!("mock transport lock poisoned"))?
            .push(request.clone());

        if let Some(message) = &self.failure {
            return Err(anyhow!(message.clone()));
        }

        Ok(match &self.response {
            Some(response) => response.clone(),
            None => Response::new(200, "").with_url(request.full_url()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HttpMethod;

    #[tokio::test]
    async fn test_records_requests() {
        let transport = MockTransport::new();
        let request = PreparedRequest::new(HttpMethod::Get, "http://localhost/get");
        let response = transport.perform(&request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.url, "http://localhost/get");
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(transport.last_request(), Some(request));
    }
}
