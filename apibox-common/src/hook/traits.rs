use crate::error::Result;
use crate::transport::Response;

/// 响应钩子
///
/// 在响应返回给调用方之前统一加工，例如解码 JSON。
/// 客户端按钩子类型参数化，默认 [`RawResponse`] 原样返回。
pub trait ResponseHook: Send + Sync {
    type Output: Send;

    /// 处理响应
    ///
    /// # 参数
    /// - `response`: 传输层返回的原始响应
    fn process(&self, response: Response) -> Result<Self::Output>;
}

/// 原样返回响应
#[derive(Debug, Default, Clone, Copy)]
pub struct RawResponse;

impl ResponseHook for RawResponse {
    type Output = Response;

    fn process(&self, response: Response) -> Result<Response> {
        Ok(response)
    }
}

/// 将响应体解码为 `serde_json::Value`
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonBody;

impl ResponseHook for JsonBody {
    type Output = serde_json::Value;

    fn process(&self, response: Response) -> Result<serde_json::Value> {
        response.json()
    }
}

/// 将响应体按 UTF-8 转为字符串
#[derive(Debug, Default, Clone, Copy)]
pub struct TextBody;

impl ResponseHook for TextBody {
    type Output = String;

    fn process(&self, response: Response) -> Result<String> {
        Ok(response.text())
    }
}
