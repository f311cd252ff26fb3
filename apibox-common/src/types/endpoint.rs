use std::collections::BTreeMap;
use std::fmt::Display;

use crate::types::http::{ContentType, HttpMethod};

/// 单个端点的声明
///
/// `content_type` 为空时使用客户端声明的默认内容类型。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDeclaration {
    pub method: HttpMethod,
    pub content_type: Option<ContentType>,
    pub default_params: BTreeMap<String, String>,
    pub default_headers: BTreeMap<String, String>,
}

impl EndpointDeclaration {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            content_type: None,
            default_params: BTreeMap::new(),
            default_headers: BTreeMap::new(),
        }
    }

    pub fn get() -> Self {
        Self::new(HttpMethod::Get)
    }

    pub fn post() -> Self {
        Self::new(HttpMethod::Post)
    }

    pub fn put() -> Self {
        Self::new(HttpMethod::Put)
    }

    pub fn patch() -> Self {
        Self::new(HttpMethod::Patch)
    }

    pub fn delete() -> Self {
        Self::new(HttpMethod::Delete)
    }

    /// 覆盖默认内容类型
    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// 添加默认查询参数
    pub fn default_param(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.default_params.insert(key.into(), value.to_string());
        self
    }

    /// 添加默认请求头
    pub fn default_header(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.default_headers.insert(key.into(), value.to_string());
        self
    }
}
