use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;

use crate::call::{Call, FilePart, Payload};
use crate::declaration::CompiledApi;
use crate::error::{ApiError, Result};
use crate::types::{ContentType, HttpMethod, TokenConfig, TokenLocation};

const CONTENT_TYPE: &str = "Content-Type";

/// 构建完成、等待发送的请求
///
/// `url` 只包含 `base_url` 与路径，查询参数单独放在 `params` 中，
/// 由传输层负责编码，避免重复拼接。
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub params: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
    pub headers: BTreeMap<String, String>,
    pub files: BTreeMap<String, FilePart>,
    pub timeout: Option<Duration>,
}

impl PreparedRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: BTreeMap::new(),
            body: None,
            headers: BTreeMap::new(),
            files: BTreeMap::new(),
            timeout: None,
        }
    }

    /// 编码后的查询字符串，没有参数时为 None
    pub fn query_string(&self) -> Option<String> {
        if self.params.is_empty() {
            None
        } else {
            Some(encode_pairs(
                self.params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            ))
        }
    }

    /// 带查询字符串的完整 URL
    pub fn full_url(&self) -> String {
        match self.query_string() {
            Some(query) => format!("{}?{}", self.url, query),
            None => self.url.clone(),
        }
    }

    /// 忽略大小写读取请求头
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|body| String::from_utf8_lossy(body).into_owned())
    }
}

/// 请求构建器
///
/// 按以下顺序处理一次调用：查找端点、校验并代入位置参数、校验请求体、
/// 组装查询参数、请求体与请求头，最后拼出 URL。整个过程不做 I/O。
pub struct RequestBuilder<'a> {
    api: &'a CompiledApi,
    token: Option<&'a TokenConfig>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(api: &'a CompiledApi, token: Option<&'a TokenConfig>) -> Self {
        Self { api, token }
    }

    /// 为 `method_path` 构建请求
    pub fn build(&self, method_path: &str, call: &Call) -> Result<PreparedRequest> {
        let def = self
            .api
            .method_def(method_path)
            .ok_or_else(|| ApiError::UnknownEndpoint(method_path.to_string()))?;

        let path = def.materialize(&call.args)?;
        let method = def.options.method;
        Self::check_arguments(method, call)?;

        let content_type = self.api.content_type_of(def);
        let params = self.build_params(&def.options.default_params, &call.params);
        let body = Self::build_data(content_type, call.data.as_ref())?;
        let headers = self.build_headers(&def.options.default_headers, &call.headers, content_type);

        Ok(PreparedRequest {
            method,
            url: format!("{}{}", self.api.base_url(), path),
            params,
            body,
            headers,
            files: call.files.clone(),
            timeout: call.timeout.or(self.api.timeout()),
        })
    }

    /// `data` 与 `files` 只允许出现在 POST、PUT、PATCH 上
    fn check_arguments(method: HttpMethod, call: &Call) -> Result<()> {
        if call.has_data() && !method.allows_payload() {
            return Err(ApiError::invalid_arguments(format!(
                "`data` is not allowed on {method}"
            )));
        }
        if call.has_files() && !method.allows_payload() {
            return Err(ApiError::invalid_arguments(format!(
                "`files` is not allowed on {method}"
            )));
        }
        Ok(())
    }

    fn build_params(
        &self,
        defaults: &BTreeMap<String, String>,
        params: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let mut merged = defaults.clone();
        merged.extend(params.iter().map(|(k, v)| (k.clone(), v.clone())));

        if let Some((key, value)) = self.token_entry(TokenLocation::Params) {
            merged.insert(key.to_string(), value.to_string());
        }
        merged
    }

    fn build_data(content_type: &ContentType, data: Option<&Payload>) -> Result<Option<Vec<u8>>> {
        let Some(data) = data.filter(|data| !data.is_empty()) else {
            return Ok(None);
        };

        let body = match (content_type, data) {
            (ContentType::Json, Payload::Json(value @ Value::Object(_))) => serde_json::to_vec(value)
                .map_err(|e| ApiError::invalid_arguments(format!("failed to encode `data`: {e}")))?,
            (_, Payload::Text(text) | Payload::Json(Value::String(text))) => {
                text.clone().into_bytes()
            }
            (ContentType::Json, other) => {
                return Err(ApiError::invalid_arguments(format!(
                    "`data` should not be of type {} when content_type is json",
                    other.kind()
                )));
            }
            (_, Payload::Json(Value::Object(map))) => {
                let pairs: Vec<(String, String)> = map
                    .iter()
                    .map(|(k, v)| (k.clone(), value_text(v)))
                    .collect();
                encode_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))).into_bytes()
            }
            (content_type, Payload::Json(other)) => {
                return Err(ApiError::invalid_arguments(format!(
                    "`data` of type {} cannot be sent as {content_type}",
                    Payload::Json(other.clone()).kind()
                )));
            }
            (_, Payload::Bytes(bytes)) => bytes.clone(),
        };
        Ok(Some(body))
    }

    fn build_headers(
        &self,
        defaults: &BTreeMap<String, String>,
        headers: &BTreeMap<String, String>,
        content_type: &ContentType,
    ) -> BTreeMap<String, String> {
        let mut merged = defaults.clone();
        merged.extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));

        set_header(&mut merged, CONTENT_TYPE, content_type.header_value());
        if let Some((key, value)) = self.token_entry(TokenLocation::Headers) {
            set_header(&mut merged, key, value);
        }
        merged
    }

    fn token_entry(&self, location: TokenLocation) -> Option<(&'a str, &'a str)> {
        self.token
            .filter(|token| token.is_in(location))
            .and_then(TokenConfig::entry)
    }
}

/// 设置请求头，先移除大小写不同的同名项
fn set_header(headers: &mut BTreeMap<String, String>, key: &str, value: &str) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(key));
    headers.insert(key.to_string(), value.to_string());
}

/// JSON 值转为文本：字符串取原值，其余取 JSON 表示
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// application/x-www-form-urlencoded 编码
pub(crate) fn encode_pairs<'p>(pairs: impl Iterator<Item = (&'p str, &'p str)>) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}
