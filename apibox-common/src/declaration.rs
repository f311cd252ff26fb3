use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::error::{ApiError, Result};
use crate::pattern::CompiledMethodDef;
use crate::types::{ContentType, EndpointDeclaration, TokenConfig};

/// 客户端类型的声明
///
/// 声明只描述端点表与公共配置，需要调用 [`ApiDeclaration::compile`]
/// 才能得到可供客户端使用的 [`CompiledApi`]。
#[derive(Debug, Clone, Default)]
pub struct ApiDeclaration {
    pub base_url: String,
    /// 按声明顺序保存的 (URI, 端点声明)
    pub uris: Vec<(String, EndpointDeclaration)>,
    pub default_content_type: ContentType,
    pub token_config: Option<TokenConfig>,
    pub timeout: Option<Duration>,
}

impl ApiDeclaration {
    pub fn builder() -> ApiDeclarationBuilder {
        ApiDeclarationBuilder::default()
    }

    /// 编译端点表
    ///
    /// `base_url` 或 `uris` 为空时返回 `Configuration`；
    /// 两个 URI 得到同一个方法路径时返回 `EndpointConflict`。
    pub fn compile(&self) -> Result<CompiledApi> {
        let base_url = self.base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ApiError::configuration("`base_url` is required"));
        }
        if self.uris.is_empty() {
            return Err(ApiError::configuration("`uris` is required"));
        }

        let mut method_defs: HashMap<String, CompiledMethodDef> = HashMap::new();
        let mut prefixes = HashSet::new();

        for (uri, options) in &self.uris {
            let def = CompiledMethodDef::new(uri, options.clone())?;
            if let Some(existing) = method_defs.get(&def.method_path) {
                return Err(ApiError::EndpointConflict {
                    method_path: def.method_path.clone(),
                    first: existing.uri.clone(),
                    second: uri.clone(),
                });
            }

            let mut prefix = String::new();
            for name in def.method_path.split('.') {
                if !prefix.is_empty() {
                    prefix.push('.');
                }
                prefix.push_str(name);
                prefixes.insert(prefix.clone());
            }

            method_defs.insert(def.method_path.clone(), def);
        }

        log::debug!("compiled {} endpoint(s) for {}", method_defs.len(), base_url);

        Ok(CompiledApi {
            base_url: base_url.to_string(),
            default_content_type: self.default_content_type.clone(),
            token_config: self.token_config.clone(),
            timeout: self.timeout,
            method_defs,
            prefixes,
        })
    }
}

/// [`ApiDeclaration`] 的构建器
#[derive(Debug, Default)]
pub struct ApiDeclarationBuilder {
    declaration: ApiDeclaration,
}

impl ApiDeclarationBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.declaration.base_url = base_url.into();
        self
    }

    pub fn default_content_type(mut self, content_type: ContentType) -> Self {
        self.declaration.default_content_type = content_type;
        self
    }

    /// 声明一个端点
    pub fn endpoint(mut self, uri: impl Into<String>, endpoint: EndpointDeclaration) -> Self {
        self.declaration.uris.push((uri.into(), endpoint));
        self
    }

    pub fn token(mut self, token_config: TokenConfig) -> Self {
        self.declaration.token_config = Some(token_config);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.declaration.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> ApiDeclaration {
        self.declaration
    }
}

/// 编译后的端点表，创建后不可变
#[derive(Debug)]
pub struct CompiledApi {
    base_url: String,
    default_content_type: ContentType,
    token_config: Option<TokenConfig>,
    timeout: Option<Duration>,
    method_defs: HashMap<String, CompiledMethodDef>,
    prefixes: HashSet<String>,
}

impl CompiledApi {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_content_type(&self) -> &ContentType {
        &self.default_content_type
    }

    /// 声明中的 token 配置模板
    pub fn token_config(&self) -> Option<&TokenConfig> {
        self.token_config.as_ref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn method_def(&self, method_path: &str) -> Option<&CompiledMethodDef> {
        self.method_defs.get(method_path)
    }

    pub fn method_defs(&self) -> impl Iterator<Item = &CompiledMethodDef> {
        self.method_defs.values()
    }

    /// 端点实际使用的内容类型
    pub fn content_type_of<'a>(&'a self, def: &'a CompiledMethodDef) -> &'a ContentType {
        def.options
            .content_type
            .as_ref()
            .unwrap_or(&self.default_content_type)
    }

    /// 是否为某个已声明方法路径的前缀（含完整路径）
    pub fn is_prefix(&self, method_path: &str) -> bool {
        self.prefixes.contains(method_path)
    }
}
