use syn::{LitStr, Path};

use crate::types::http::{ContentType, HttpMethod};
use crate::types::token::TokenLocation;

/// `#[api_client(...)]` 的参数
pub struct ApiClientArgs {
    pub base_url: LitStr,
    pub default_content_type: Option<ContentType>,
    /// 超时时间（秒）
    pub timeout: Option<f64>,
    pub token: Option<TokenArgs>,
    pub hook: Option<Path>,
    pub endpoints: Vec<EndpointArgs>,
}

/// `token(...)` 的参数
pub struct TokenArgs {
    pub location: TokenLocation,
    pub key: LitStr,
    pub value: Option<LitStr>,
}

/// `endpoint(...)` 的参数
pub struct EndpointArgs {
    pub uri: LitStr,
    /// 解析阶段由 URI 拆解得到的方法路径
    pub method_path: String,
    pub method: HttpMethod,
    pub content_type: Option<ContentType>,
    pub default_params: Vec<(String, String)>,
    pub default_headers: Vec<(String, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::Span;

    #[test]
    fn test_endpoint_args_creation() {
        let args = EndpointArgs {
            uri: LitStr::new("/posts/all", Span::call_site()),
            method_path: "posts.all".to_string(),
            method: HttpMethod::Get,
            content_type: Some(ContentType::Json),
            default_params: vec![("a".to_string(), "b".to_string())],
            default_headers: Vec::new(),
        };

        assert_eq!(args.method, HttpMethod::Get);
        assert_eq!(args.uri.value(), "/posts/all");
        assert_eq!(args.content_type, Some(ContentType::Json));
    }

    #[test]
    fn test_api_client_args_creation() {
        let args = ApiClientArgs {
            base_url: LitStr::new("https://api.pinboard.in/v1", Span::call_site()),
            default_content_type: None,
            timeout: Some(2.0),
            token: Some(TokenArgs {
                location: TokenLocation::Params,
                key: LitStr::new("auth_token", Span::call_site()),
                value: None,
            }),
            hook: None,
            endpoints: Vec::new(),
        };

        assert_eq!(args.base_url.value(), "https://api.pinboard.in/v1");
        assert_eq!(args.token.unwrap().key.value(), "auth_token");
    }
}
