use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::call::Call;
use crate::declaration::CompiledApi;
use crate::error::{ApiError, Result, TransportError};
use crate::hook::{RawResponse, ResponseHook};
use crate::path::ResourcePath;
use crate::request::{PreparedRequest, RequestBuilder, encode_pairs};
use crate::transport::{ReqwestTransport, Response, Transport};
use crate::types::{TokenConfig, TokenLocation};

/// API 客户端
///
/// 持有编译后的端点表（多个实例共享）、自己的一份 token 配置、
/// 传输层以及响应钩子。
///
/// token 配置的修改方法需要 `&mut self`，并发调用方需要自行同步。
pub struct ApiClient<H: ResponseHook = RawResponse> {
    api: Arc<CompiledApi>,
    token_config: Option<TokenConfig>,
    transport: Arc<dyn Transport>,
    hook: H,
}

impl<H: ResponseHook + Default> ApiClient<H> {
    /// 创建客户端实例
    ///
    /// # 参数
    ///
    /// * `api` - 编译后的端点表
    /// * `token` - 调用方提供的 token，覆盖声明中的默认值
    ///
    /// # 错误
    ///
    /// 声明了 token 配置但缺少键名或最终没有 token 值，
    /// 或者未声明 token 配置却传入了 token，都返回 `Configuration`。
    pub fn new(api: Arc<CompiledApi>, token: Option<&str>) -> Result<Self> {
        let token_config = resolve_token(api.token_config(), token)?;
        Ok(Self {
            api,
            token_config,
            transport: Arc::new(ReqwestTransport::default()),
            hook: H::default(),
        })
    }
}

impl<H: ResponseHook> ApiClient<H> {
    /// 替换传输层（链式调用）
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// 替换响应钩子
    pub fn with_hook<T: ResponseHook>(self, hook: T) -> ApiClient<T> {
        ApiClient {
            api: self.api,
            token_config: self.token_config,
            transport: self.transport,
            hook,
        }
    }

    pub fn api(&self) -> &CompiledApi {
        &self.api
    }

    pub fn token_config(&self) -> Option<&TokenConfig> {
        self.token_config.as_ref()
    }

    /// 切换 token 的注入位置，只影响之后构建的请求
    pub fn set_token_location(&mut self, location: TokenLocation) -> Result<()> {
        self.token_config_mut()?.location = location;
        Ok(())
    }

    pub fn set_token_key(&mut self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        if key.is_empty() {
            return Err(ApiError::configuration("`key` in `token_config` is required"));
        }
        self.token_config_mut()?.key = key;
        Ok(())
    }

    pub fn set_token(&mut self, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        if value.is_empty() {
            return Err(ApiError::configuration("`token` must not be empty"));
        }
        self.token_config_mut()?.value = Some(value);
        Ok(())
    }

    fn token_config_mut(&mut self) -> Result<&mut TokenConfig> {
        self.token_config
            .as_mut()
            .ok_or_else(|| ApiError::configuration("`token_config` is not declared"))
    }

    /// 从根段开始构建资源路径
    pub fn path(&self, name: impl Into<String>) -> ResourcePath<'_, H> {
        ResourcePath::root(self, name.into())
    }

    /// 只构建请求，不发送
    pub fn prepare(&self, method_path: &str, call: &Call) -> Result<PreparedRequest> {
        RequestBuilder::new(&self.api, self.token_config.as_ref()).build(method_path, call)
    }

    /// 构建、发送请求并交给响应钩子处理
    pub async fn call(&self, method_path: &str, call: Call) -> Result<H::Output> {
        let request = self.prepare(method_path, &call)?;
        let response = self.dispatch(&request).await?;
        self.hook.process(response)
    }

    /// 发送已构建的请求，传输层失败包装为 `ApiError::Transport`
    pub async fn dispatch(&self, request: &PreparedRequest) -> Result<Response> {
        log::info!(
            "[REQUEST] {} {}; Headers: {:?}",
            request.method,
            self.loggable_url(request),
            self.loggable_headers(&request.headers)
        );

        match self.transport.perform(request).await {
            Ok(response) => {
                log::info!("[RESPONSE] {} {}", response.status, response.preview(100));
                Ok(response)
            }
            Err(failure) => {
                let err = TransportError::from_failure(&failure);
                log::warn!("[FAILURE] {} {}: {}", request.method, request.url, err);
                Err(ApiError::Transport(err))
            }
        }
    }

    /// 日志中隐藏 token 请求头的值
    fn loggable_headers(&self, headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        self.redact(TokenLocation::Headers, headers)
    }

    /// 日志中的完整 URL，查询参数里的 token 同样隐藏
    fn loggable_url(&self, request: &PreparedRequest) -> String {
        let params = self.redact(TokenLocation::Params, &request.params);
        if params.is_empty() {
            return request.url.clone();
        }
        let query = encode_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        format!("{}?{}", request.url, query)
    }

    fn redact(
        &self,
        location: TokenLocation,
        entries: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let token_key = self
            .token_config
            .as_ref()
            .filter(|token| token.is_in(location))
            .map(|token| token.key.as_str());

        entries
            .iter()
            .map(|(key, value)| match token_key {
                Some(token_key) if key.eq_ignore_ascii_case(token_key) => {
                    (key.clone(), "***".to_string())
                }
                _ => (key.clone(), value.clone()),
            })
            .collect()
    }
}

impl<H: ResponseHook + Clone> Clone for ApiClient<H> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            token_config: self.token_config.clone(),
            transport: Arc::clone(&self.transport),
            hook: self.hook.clone(),
        }
    }
}

impl<H: ResponseHook> fmt::Debug for ApiClient<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.api.base_url())
            .field("token_location", &self.token_config.as_ref().map(|t| t.location))
            .finish()
    }
}

/// 合并声明中的 token 配置与调用方传入的 token
fn resolve_token(declared: Option<&TokenConfig>, token: Option<&str>) -> Result<Option<TokenConfig>> {
    let token = token.filter(|token| !token.is_empty());

    let Some(declared) = declared else {
        if token.is_some() {
            return Err(ApiError::configuration(
                "`token_config` must be set to pass `token` into it",
            ));
        }
        return Ok(None);
    };

    // 每个实例一份拷贝
    let mut config = declared.clone();
    if config.key.is_empty() {
        return Err(ApiError::configuration("`key` in `token_config` is required"));
    }
    if let Some(token) = token {
        config.value = Some(token.to_string());
    }
    if config.entry().is_none() {
        return Err(ApiError::configuration(
            "if `token_config` is set, `token` must be set or passed",
        ));
    }
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::ApiDeclaration;
    use crate::hook::JsonBody;
    use crate::testing::MockTransport;
    use crate::types::{ContentType, EndpointDeclaration};
    use serde_json::json;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn declaration(token: Option<TokenConfig>) -> Arc<CompiledApi> {
        let mut builder = ApiDeclaration::builder()
            .base_url("http://httpbin.org")
            .default_content_type(ContentType::Json)
            .endpoint("/get", EndpointDeclaration::get().default_param("a", "b"))
            .endpoint(r"/get/(\w+)/wtf", EndpointDeclaration::get())
            .endpoint("/post", EndpointDeclaration::post());
        if let Some(token) = token {
            builder = builder.token(token);
        }
        Arc::new(builder.build().compile().unwrap())
    }

    #[test]
    fn test_token_required_when_declared() {
        let api = declaration(Some(TokenConfig::params("token")));
        let result = ApiClient::<RawResponse>::new(api.clone(), None);
        assert!(matches!(result, Err(ApiError::Configuration(_))));

        let client = ApiClient::<RawResponse>::new(api, Some("fake-token")).unwrap();
        assert_eq!(
            client.token_config().unwrap().value.as_deref(),
            Some("fake-token")
        );
    }

    #[test]
    fn test_declared_token_value_is_used() {
        let api = declaration(Some(TokenConfig::params("token").with_value("default")));
        let client = ApiClient::<RawResponse>::new(api.clone(), None).unwrap();
        assert_eq!(client.token_config().unwrap().value.as_deref(), Some("default"));

        let client = ApiClient::<RawResponse>::new(api, Some("override")).unwrap();
        assert_eq!(client.token_config().unwrap().value.as_deref(), Some("override"));
    }

    #[test]
    fn test_token_key_required() {
        let api = declaration(Some(TokenConfig::params("")));
        let result = ApiClient::<RawResponse>::new(api, Some("fake-token"));
        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }

    #[test]
    fn test_token_without_config_is_rejected() {
        let api = declaration(None);
        let result = ApiClient::<RawResponse>::new(api.clone(), Some("fake-token"));
        assert!(matches!(result, Err(ApiError::Configuration(_))));
        assert!(ApiClient::<RawResponse>::new(api, None).is_ok());
    }

    #[test]
    fn test_instances_do_not_share_token_config() {
        let api = declaration(Some(TokenConfig::params("token")));
        let mut first = ApiClient::<RawResponse>::new(api.clone(), Some("one")).unwrap();
        let second = ApiClient::<RawResponse>::new(api.clone(), Some("two")).unwrap();

        first.set_token_location(TokenLocation::Headers).unwrap();
        first.set_token_key("X-Token").unwrap();

        assert_eq!(second.token_config().unwrap().location, TokenLocation::Params);
        assert_eq!(second.token_config().unwrap().key, "token");
        assert_eq!(api.token_config().unwrap().key, "token");
    }

    #[test]
    fn test_switching_token_location() {
        let api = declaration(Some(TokenConfig::params("token")));
        let mut client = ApiClient::<RawResponse>::new(api, Some("fake-token")).unwrap();

        let before = client.prepare("get", &Call::new()).unwrap();
        client.set_token_location(TokenLocation::Headers).unwrap();
        let after = client.prepare("get", &Call::new()).unwrap();

        assert_eq!(before.params.get("token").map(String::as_str), Some("fake-token"));
        assert!(before.header("token").is_none());
        assert!(!after.params.contains_key("token"));
        assert_eq!(after.header("token"), Some("fake-token"));
    }

    #[test]
    fn test_setters_without_token_config() {
        let api = declaration(None);
        let mut client = ApiClient::<RawResponse>::new(api, None).unwrap();
        assert!(client.set_token_location(TokenLocation::Headers).is_err());
        assert!(client.set_token("x").is_err());
    }

    #[tokio::test]
    async fn test_call_dispatches_to_transport() {
        init_logger();
        let transport = Arc::new(MockTransport::new());
        let client = ApiClient::<RawResponse>::new(declaration(None), None)
            .unwrap()
            .with_transport(transport.clone());

        let response = client
            .call("get", Call::new().param("c", 1))
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let request = transport.last_request().unwrap();
        assert_eq!(request.full_url(), "http://httpbin.org/get?a=b&c=1");
    }

    #[tokio::test]
    async fn test_transport_failure_is_wrapped() {
        init_logger();
        let transport = Arc::new(MockTransport::failing("connection refused"));
        let client = ApiClient::<RawResponse>::new(declaration(None), None)
            .unwrap()
            .with_transport(transport);

        let err = client.call("get", Call::new()).await.unwrap_err();
        match err {
            ApiError::Transport(err) => {
                assert_eq!(err.kind, "Error");
                assert_eq!(err.message, "connection refused");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_build_errors_do_not_reach_transport() {
        let transport = Arc::new(MockTransport::new());
        let client = ApiClient::<RawResponse>::new(declaration(None), None)
            .unwrap()
            .with_transport(transport.clone());

        let err = client.call("get.wtf", Call::new()).await.unwrap_err();
        assert!(matches!(err, ApiError::ArgumentCountMismatch { .. }));
        let err = client
            .call("get", Call::new().json(json!({ "a": 1 })))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequestArguments(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_hook_processes_response() {
        let transport = Arc::new(MockTransport::respond_with(Response::new(
            200,
            r#"{"json":{"name":"apibox"}}"#,
        )));
        let client = ApiClient::<JsonBody>::new(declaration(None), None)
            .unwrap()
            .with_transport(transport);

        let body = client
            .call("post", Call::new().json(json!({ "name": "apibox" })))
            .await
            .unwrap();
        assert_eq!(body["json"]["name"], "apibox");
    }

    #[test]
    fn test_loggable_headers_hide_token() {
        let api = declaration(Some(TokenConfig::headers("X-Token")));
        let client = ApiClient::<RawResponse>::new(api, Some("secret")).unwrap();
        let request = client.prepare("get", &Call::new()).unwrap();
        let headers = client.loggable_headers(&request.headers);
        assert_eq!(headers.get("X-Token").map(String::as_str), Some("***"));
        assert_eq!(client.loggable_url(&request), "http://httpbin.org/get?a=b");
    }

    #[test]
    fn test_loggable_url_hides_token_param() {
        let api = declaration(Some(TokenConfig::params("token")));
        let client = ApiClient::<RawResponse>::new(api, Some("secret")).unwrap();
        let request = client.prepare("get", &Call::new().param("c", 1)).unwrap();

        let url = client.loggable_url(&request);
        assert_eq!(url, "http://httpbin.org/get?a=b&c=1&token=***");
        assert!(!url.contains("secret"));
        assert!(request.full_url().contains("token=secret"));
        assert!(client.loggable_headers(&request.headers).values().all(|v| v != "***"));
    }
}
