use std::fmt;
use std::str::FromStr;

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

use crate::error::ApiError;

/// token 注入的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLocation {
    /// 查询参数
    Params,
    /// 请求头
    Headers,
}

impl TokenLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenLocation::Params => "params",
            TokenLocation::Headers => "headers",
        }
    }
}

impl fmt::Display for TokenLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenLocation {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "params" => Ok(TokenLocation::Params),
            "headers" => Ok(TokenLocation::Headers),
            other => Err(ApiError::configuration(format!(
                "token location must be `params` or `headers`, got `{other}`"
            ))),
        }
    }
}

impl ToTokens for TokenLocation {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(match self {
            TokenLocation::Params => quote! { ::apibox_common::TokenLocation::Params },
            TokenLocation::Headers => quote! { ::apibox_common::TokenLocation::Headers },
        });
    }
}

/// token 配置
///
/// 声明中给出的是模板；每个客户端实例持有自己的一份拷贝，
/// 之后对位置、键名或值的修改只影响该实例。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    pub location: TokenLocation,
    pub key: String,
    pub value: Option<String>,
}

impl TokenConfig {
    pub fn new(location: TokenLocation, key: impl Into<String>) -> Self {
        Self {
            location,
            key: key.into(),
            value: None,
        }
    }

    /// token 放在查询参数中
    pub fn params(key: impl Into<String>) -> Self {
        Self::new(TokenLocation::Params, key)
    }

    /// token 放在请求头中
    pub fn headers(key: impl Into<String>) -> Self {
        Self::new(TokenLocation::Headers, key)
    }

    /// 设置默认 token 值（链式调用）
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn is_in(&self, location: TokenLocation) -> bool {
        self.location == location
    }

    /// 返回需要注入的 (键, 值)，值缺失时为 None
    pub fn entry(&self) -> Option<(&str, &str)> {
        self.value
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(|value| (self.key.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_location_from_str() {
        assert_eq!("params".parse::<TokenLocation>().unwrap(), TokenLocation::Params);
        assert_eq!("headers".parse::<TokenLocation>().unwrap(), TokenLocation::Headers);
        assert!("cookies".parse::<TokenLocation>().is_err());
    }

    #[test]
    fn test_token_config_entry() {
        let config = TokenConfig::headers("X-Token");
        assert!(config.entry().is_none());

        let config = config.with_value("secret");
        assert_eq!(config.entry(), Some(("X-Token", "secret")));
        assert!(config.is_in(TokenLocation::Headers));
        assert!(!config.is_in(TokenLocation::Params));
    }
}
