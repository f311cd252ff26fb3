use thiserror::Error;

/// apibox 的错误类型
///
/// 所有错误都在违反约定的位置同步返回给调用方，内部不做重试，也不吞掉错误。
#[derive(Debug, Error)]
pub enum ApiError {
    /// 声明或 token 配置有误（构造阶段）
    #[error("configuration error: {0}")]
    Configuration(String),

    /// 两个 URI 拆解后得到相同的方法路径
    #[error("method path `{method_path}` is declared by both `{first}` and `{second}`")]
    EndpointConflict {
        method_path: String,
        first: String,
        second: String,
    },

    /// 方法路径未声明
    #[error("method path `{0}` is not in uris")]
    UnknownEndpoint(String),

    /// 位置参数个数与捕获段个数不一致
    #[error("`{method_path}` expects {expected} positional argument(s), got {actual}")]
    ArgumentCountMismatch {
        method_path: String,
        expected: usize,
        actual: usize,
    },

    /// 位置参数不匹配对应的捕获正则
    #[error("argument {index} `{value}` does not match pattern `{pattern}`")]
    ArgumentPatternMismatch {
        index: usize,
        value: String,
        pattern: String,
    },

    /// 请求体与方法或内容类型不匹配
    #[error("invalid request arguments: {0}")]
    InvalidRequestArguments(String),

    /// 传输层失败
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// 响应钩子解码失败
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidRequestArguments(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// 传输层失败的诊断信息
///
/// `kind` 保留原始失败的类别（reqwest 错误按超时、连接等归类），
/// `message` 保留原始错误链的文本。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: String,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// 从传输层返回的 `anyhow::Error` 归纳出失败类别
    pub fn from_failure(error: &anyhow::Error) -> Self {
        let kind = if let Some(err) = error.downcast_ref::<reqwest::Error>() {
            reqwest_kind(err)
        } else if let Some(err) = error.downcast_ref::<std::io::Error>() {
            format!("io::{:?}", err.kind())
        } else {
            "Error".to_string()
        };

        Self::new(kind, format!("{error:#}"))
    }
}

fn reqwest_kind(err: &reqwest::Error) -> String {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else if err.is_redirect() {
        "redirect"
    } else if err.is_body() {
        "body"
    } else if err.is_decode() {
        "decode"
    } else if err.is_builder() {
        "builder"
    } else {
        "request"
    };
    kind.to_string()
}
