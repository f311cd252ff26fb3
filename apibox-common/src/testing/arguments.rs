use std::fmt;

use anyhow::{Context, bail};
use serde_json::{Map, Value};

use crate::request::{PreparedRequest, encode_pairs, value_text};
use crate::types::HttpMethod;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// 夹具展开后的一组请求参数
#[derive(Debug, Clone, PartialEq)]
pub struct RequestArguments {
    pub arguments: Map<String, Value>,
}

impl RequestArguments {
    /// 没有 `url` 时由 `base_url + uri` 计算（没有 `base_url` 时取 `uri`）
    pub fn new(mut arguments: Map<String, Value>) -> Self {
        if !arguments.contains_key("url") {
            let base_url = arguments.get("base_url").and_then(Value::as_str);
            let uri = arguments.get("uri").and_then(Value::as_str);
            let url = match (base_url, uri) {
                (Some(base_url), Some(uri)) => Some(format!("{base_url}{uri}")),
                (None, Some(uri)) => Some(uri.to_string()),
                _ => None,
            };
            if let Some(url) = url {
                arguments.insert("url".to_string(), Value::String(url));
            }
        }
        Self { arguments }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key)
    }

    pub fn method(&self) -> Option<&str> {
        self.get("method").and_then(Value::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.get("url").and_then(Value::as_str)
    }

    /// `data` 的 JSON 文本，为空时返回空串
    pub fn data_str(&self) -> String {
        match self.get("data") {
            Some(data) if is_present(data) => data.to_string(),
            _ => String::new(),
        }
    }

    /// `params` 的查询字符串，为空时返回空串
    pub fn params_str(&self) -> String {
        match self.get("params") {
            Some(Value::Object(params)) => encode_object(params),
            Some(Value::String(params)) => params.clone(),
            _ => String::new(),
        }
    }

    /// 转为可交给传输层的请求
    ///
    /// `data` 为对象时按表单编码，为字符串时原样发送；
    /// `cookies` 合并进 `Cookie` 请求头。
    pub fn to_request(&self) -> anyhow::Result<PreparedRequest> {
        let method: HttpMethod = self
            .method()
            .context("fixture request is missing `method`")?
            .parse()?;
        let url = self
            .url()
            .context("fixture request is missing `uri` or `url`")?;

        let mut request = PreparedRequest::new(method, url);

        if let Some(params) = self.get("params") {
            request.params = string_map(params, "params")?;
        }
        if let Some(headers) = self.get("headers") {
            request.headers = string_map(headers, "headers")?;
        }
        if let Some(cookies) = self.get("cookies") {
            let cookie = string_map(cookies, "cookies")?
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            if !cookie.is_empty() {
                request.headers.insert("Cookie".to_string(), cookie);
            }
        }

        match self.get("data") {
            None | Some(Value::Null) => {}
            Some(Value::Object(data)) => {
                if !data.is_empty() {
                    request.body = Some(encode_object(data).into_bytes());
                    if request.header("content-type").is_none() {
                        request
                            .headers
                            .insert("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string());
                    }
                }
            }
            Some(Value::String(data)) => {
                if !data.is_empty() {
                    request.body = Some(data.clone().into_bytes());
                }
            }
            Some(other) => bail!("fixture `data` must be a mapping or a string, got {other}"),
        }

        Ok(request)
    }
}

impl fmt::Display for RequestArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = if self.arguments.contains_key("data") {
            self.data_str()
        } else if self.arguments.contains_key("params") {
            self.params_str()
        } else {
            String::new()
        };
        let short: String = short.chars().take(50).collect();

        write!(
            f,
            "{} {} {}",
            self.method().unwrap_or_default(),
            self.url().unwrap_or_default(),
            short
        )
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

fn encode_object(map: &Map<String, Value>) -> String {
    let pairs: Vec<(&str, String)> = map
        .iter()
        .map(|(k, v)| (k.as_str(), value_text(v)))
        .collect();
    encode_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
}

fn string_map(
    value: &Value,
    field: &str,
) -> anyhow::Result<std::collections::BTreeMap<String, String>> {
    match value {
        Value::Null => Ok(Default::default()),
        Value::Object(map) => Ok(map
            .iter()
            .map(|(k, v)| (k.clone(), value_text(v)))
            .collect()),
        other => bail!("fixture `{field}` must be a mapping, got {other}"),
    }
}
