use std::fmt;
use std::str::FromStr;

use proc_macro2::{Ident, Span, TokenStream};
use quote::{ToTokens, quote};
use syn::parse::{Parse, ParseStream};

use crate::error::ApiError;

/// multipart 请求头中使用的固定 boundary
pub const MULTIPART_BOUNDARY: &str = "__X_APIBOX_BOUNDARY__";

/// HTTP 方法枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// 返回HTTP方法的字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// 是否允许携带 `data` / `files`
    pub fn allows_payload(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }

    /// 转换为 reqwest 的方法类型
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }

    fn variant_name(&self) -> &'static str {
        match self {
            HttpMethod::Get => "Get",
            HttpMethod::Post => "Post",
            HttpMethod::Put => "Put",
            HttpMethod::Patch => "Patch",
            HttpMethod::Delete => "Delete",
            HttpMethod::Head => "Head",
            HttpMethod::Options => "Options",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            "" => Err(ApiError::configuration("endpoint method must not be empty")),
            other => Err(ApiError::configuration(format!(
                "unsupported HTTP method: {other}"
            ))),
        }
    }
}

impl ToTokens for HttpMethod {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let variant = Ident::new(self.variant_name(), Span::call_site());
        tokens.extend(quote! { ::apibox_common::HttpMethod::#variant });
    }
}

/// 内容类型枚举
///
/// 未识别的名字按原样作为 `Content-Type` 头的值。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    Text,
    Json,
    Form,
    Multipart,
    Raw(String),
}

impl ContentType {
    /// 按名字解析：`text`、`json`、`form`、`multipart`，其余视为原始头部值
    pub fn from_name(name: &str) -> Self {
        match name {
            "text" => ContentType::Text,
            "json" => ContentType::Json,
            "form" => ContentType::Form,
            "multipart" => ContentType::Multipart,
            other => ContentType::Raw(other.to_string()),
        }
    }

    /// 返回 `Content-Type` 头的值
    pub fn header_value(&self) -> &str {
        match self {
            ContentType::Text => "text/plain; charset=utf-8",
            ContentType::Json => "application/json; charset=utf-8",
            ContentType::Form => "application/x-www-form-urlencoded; charset=utf-8",
            ContentType::Multipart => {
                "multipart/form-data; charset=utf-8; boundary=__X_APIBOX_BOUNDARY__"
            }
            ContentType::Raw(value) => value,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Text => f.write_str("text"),
            ContentType::Json => f.write_str("json"),
            ContentType::Form => f.write_str("form"),
            ContentType::Multipart => f.write_str("multipart"),
            ContentType::Raw(value) => f.write_str(value),
        }
    }
}

impl Parse for ContentType {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(syn::LitStr) {
            let lit: syn::LitStr = input.parse()?;
            return Ok(ContentType::from_name(&lit.value()));
        }

        let ident: Ident = input.parse()?;
        match ident.to_string().as_str() {
            "text" => Ok(ContentType::Text),
            "json" => Ok(ContentType::Json),
            "form" => Ok(ContentType::Form),
            "multipart" => Ok(ContentType::Multipart),
            _ => Err(syn::Error::new_spanned(
                ident,
                "content_type must be one of 'text', 'json', 'form', 'multipart' or a string literal",
            )),
        }
    }
}

impl ToTokens for ContentType {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(match self {
            ContentType::Text => quote! { ::apibox_common::ContentType::Text },
            ContentType::Json => quote! { ::apibox_common::ContentType::Json },
            ContentType::Form => quote! { ::apibox_common::ContentType::Form },
            ContentType::Multipart => quote! { ::apibox_common::ContentType::Multipart },
            ContentType::Raw(value) => {
                quote! { ::apibox_common::ContentType::Raw(::std::string::String::from(#value)) }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_as_str() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Patch.as_str(), "PATCH");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }

    #[test]
    fn test_http_method_from_str() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!(" Patch ".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!(matches!(
            "".parse::<HttpMethod>(),
            Err(ApiError::Configuration(_))
        ));
        assert!("FETCH".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_allows_payload() {
        assert!(HttpMethod::Post.allows_payload());
        assert!(HttpMethod::Put.allows_payload());
        assert!(HttpMethod::Patch.allows_payload());
        assert!(!HttpMethod::Get.allows_payload());
        assert!(!HttpMethod::Delete.allows_payload());
    }

    #[test]
    fn test_content_type_header_value() {
        assert_eq!(ContentType::Json.header_value(), "application/json; charset=utf-8");
        assert!(ContentType::Multipart.header_value().contains(MULTIPART_BOUNDARY));
        assert_eq!(
            ContentType::from_name("application/xml").header_value(),
            "application/xml"
        );
        assert_eq!(ContentType::default(), ContentType::Text);
    }

    #[test]
    fn test_parse_content_type() {
        let ct: ContentType = syn::parse_quote! { form };
        assert_eq!(ct, ContentType::Form);

        let ct: ContentType = syn::parse_quote! { "application/xml" };
        assert_eq!(ct, ContentType::Raw("application/xml".to_string()));

        let result = syn::parse_str::<ContentType>("xml");
        assert!(result.is_err());
    }

    #[test]
    fn test_http_method_to_tokens() {
        let method = HttpMethod::Patch;
        let expected = quote! { ::apibox_common::HttpMethod::Patch };
        assert_eq!(quote! { #method }.to_string(), expected.to_string());
    }
}
