use std::collections::BTreeMap;
use std::fmt::Display;
use std::time::Duration;

use serde_json::Value;

/// 请求体
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// JSON 值；对象在 json 内容类型下序列化，其余内容类型下按表单编码
    Json(Value),
    Text(String),
    Bytes(Vec<u8>),
}

impl Payload {
    /// 空请求体视为未提供
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Json(Value::Null) => true,
            Payload::Json(Value::Object(map)) => map.is_empty(),
            Payload::Json(Value::Array(items)) => items.is_empty(),
            Payload::Json(Value::String(text)) => text.is_empty(),
            Payload::Json(_) => false,
            Payload::Text(text) => text.is_empty(),
            Payload::Bytes(bytes) => bytes.is_empty(),
        }
    }

    /// 用于错误信息的类型名
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Json(Value::Object(_)) => "object",
            Payload::Json(Value::Array(_)) => "array",
            Payload::Json(Value::String(_)) => "string",
            Payload::Json(Value::Number(_)) => "number",
            Payload::Json(Value::Bool(_)) => "bool",
            Payload::Json(Value::Null) => "null",
            Payload::Text(_) => "text",
            Payload::Bytes(_) => "bytes",
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(bytes)
    }
}

/// multipart 中的一个文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub content: Vec<u8>,
    pub file_name: Option<String>,
    pub mime: Option<String>,
}

impl FilePart {
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            file_name: None,
            mime: None,
        }
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// 一次调用的参数
///
/// 位置参数依次代入 URI 中的捕获段；其余字段与端点的默认值合并。
///
/// ```rust,ignore
/// let call = Call::new()
///     .arg("hello")
///     .param("c", 1)
///     .header("X-Trace", "abc")
///     .json(serde_json::json!({ "name": "apibox" }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Call {
    pub(crate) args: Vec<String>,
    pub(crate) params: BTreeMap<String, String>,
    pub(crate) headers: BTreeMap<String, String>,
    pub(crate) data: Option<Payload>,
    pub(crate) files: BTreeMap<String, FilePart>,
    pub(crate) timeout: Option<Duration>,
}

impl Call {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个位置参数
    pub fn arg(mut self, value: impl Display) -> Self {
        self.args.push(value.to_string());
        self
    }

    pub fn args<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.args.extend(values.into_iter().map(|v| v.to_string()));
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Display,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.headers.insert(key.into(), value.to_string());
        self
    }

    pub fn data(mut self, data: impl Into<Payload>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn json(self, value: Value) -> Self {
        self.data(Payload::Json(value))
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.data(Payload::Text(text.into()))
    }

    pub fn bytes(self, bytes: impl Into<Vec<u8>>) -> Self {
        self.data(Payload::Bytes(bytes.into()))
    }

    pub fn file(mut self, field: impl Into<String>, file: FilePart) -> Self {
        self.files.insert(field.into(), file);
        self
    }

    /// 透传给传输层的超时时间
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn positional_args(&self) -> &[String] {
        &self.args
    }

    /// 是否带有非空的 `data`
    pub fn has_data(&self) -> bool {
        self.data.as_ref().is_some_and(|data| !data.is_empty())
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }
}
