use std::fmt;
use std::sync::Arc;

use crate::call::Call;
use crate::client::ApiClient;
use crate::error::Result;
use crate::hook::{RawResponse, ResponseHook};
use crate::request::PreparedRequest;

/// 路径链上的一个节点，只持有父节点的引用
#[derive(Debug)]
struct PathNode {
    name: String,
    parent: Option<Arc<PathNode>>,
}

/// 资源路径
///
/// 由 [`ApiClient::path`] 和 [`ResourcePath::segment`] 逐段构建，
/// 每次都生成新的节点，不做缓存。调用时把节点链拼成方法路径，
/// 转交给客户端。
///
/// ```ignore
/// let response = client.path("get").segment("wtf").call(Call::new().arg("hello")).await?;
/// ```
pub struct ResourcePath<'c, H: ResponseHook = RawResponse> {
    client: &'c ApiClient<H>,
    node: Arc<PathNode>,
}

impl<'c, H: ResponseHook> ResourcePath<'c, H> {
    pub(crate) fn root(client: &'c ApiClient<H>, name: String) -> Self {
        Self {
            client,
            node: Arc::new(PathNode { name, parent: None }),
        }
    }

    /// 追加一段路径，总是成功
    pub fn segment(&self, name: impl Into<String>) -> Self {
        Self {
            client: self.client,
            node: Arc::new(PathNode {
                name: name.into(),
                parent: Some(Arc::clone(&self.node)),
            }),
        }
    }

    /// 从根到当前节点的各段名称
    pub fn names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut node = Some(&self.node);
        while let Some(current) = node {
            names.push(current.name.as_str());
            node = current.parent.as_ref();
        }
        names.reverse();
        names
    }

    /// 点号连接的方法路径，根段在前
    pub fn method_path(&self) -> String {
        self.names().join(".")
    }

    /// 是否为已声明端点的方法路径或其前缀
    pub fn is_declared(&self) -> bool {
        self.client.api().is_prefix(&self.method_path())
    }

    /// 只构建请求，不发送
    pub fn prepare(&self, call: &Call) -> Result<PreparedRequest> {
        self.client.prepare(&self.method_path(), call)
    }

    /// 以给定参数调用当前路径
    pub async fn call(&self, call: Call) -> Result<H::Output> {
        let method_path = self.method_path();
        self.client.call(&method_path, call).await
    }

    /// 不带参数调用当前路径
    pub async fn send(&self) -> Result<H::Output> {
        self.call(Call::new()).await
    }
}

impl<H: ResponseHook> Clone for ResourcePath<'_, H> {
    fn clone(&self) -> Self {
        Self {
            client: self.client,
            node: Arc::clone(&self.node),
        }
    }
}

impl<H: ResponseHook> fmt::Display for ResourcePath<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<ResourcePath /{}>", self.names().join("/"))
    }
}

impl<H: ResponseHook> fmt::Debug for ResourcePath<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResourcePath").field(&self.method_path()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::ApiDeclaration;
    use crate::error::ApiError;
    use crate::testing::MockTransport;
    use crate::types::EndpointDeclaration;

    fn client(transport: Arc<MockTransport>) -> ApiClient {
        let api = ApiDeclaration::builder()
            .base_url("http://httpbin.org")
            .endpoint("/get", EndpointDeclaration::get().default_param("a", "b"))
            .endpoint(r"/get/(\w+)/wtf", EndpointDeclaration::get())
            .endpoint(r"/users/(\d+)/repos", EndpointDeclaration::get())
            .build()
            .compile()
            .unwrap();
        ApiClient::new(Arc::new(api), None)
            .unwrap()
            .with_transport(transport)
    }

    #[test]
    fn test_method_path_is_root_first() {
        let client = client(Arc::new(MockTransport::new()));
        let path = client.path("users").segment("repos");
        assert_eq!(path.names(), vec!["users", "repos"]);
        assert_eq!(path.method_path(), "users.repos");
        assert_eq!(path.to_string(), "<ResourcePath /users/repos>");
    }

    #[test]
    fn test_segment_never_fails_and_does_not_mutate_parent() {
        let client = client(Arc::new(MockTransport::new()));
        let root = client.path("get");
        let anything = root.segment("does").segment("not").segment("exist");
        let wtf = root.segment("wtf");

        assert_eq!(root.method_path(), "get");
        assert_eq!(anything.method_path(), "get.does.not.exist");
        assert_eq!(wtf.method_path(), "get.wtf");
        assert!(!anything.is_declared());
        assert!(wtf.is_declared());
        assert!(client.path("users").is_declared());
    }

    #[tokio::test]
    async fn test_call_forwards_to_client() {
        let transport = Arc::new(MockTransport::new());
        let client = client(transport.clone());

        client
            .path("get")
            .segment("wtf")
            .call(Call::new().arg("hello"))
            .await
            .unwrap();
        client.path("get").send().await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url, "http://httpbin.org/get/hello/wtf");
        assert_eq!(requests[1].full_url(), "http://httpbin.org/get?a=b");
    }

    #[tokio::test]
    async fn test_call_reports_argument_errors() {
        let client = client(Arc::new(MockTransport::new()));
        let repos = client.path("users").segment("repos");

        let err = repos.send().await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::ArgumentCountMismatch { expected: 1, actual: 0, .. }
        ));

        let err = repos.call(Call::new().arg("abc")).await.unwrap_err();
        match err {
            ApiError::ArgumentPatternMismatch { index, value, .. } => {
                assert_eq!(index, 0);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = client.path("nope").send().await.unwrap_err();
        assert!(matches!(err, ApiError::UnknownEndpoint(_)));
    }

    #[test]
    fn test_prepare_through_path() {
        let client = client(Arc::new(MockTransport::new()));
        let request = client
            .path("users")
            .segment("repos")
            .prepare(&Call::new().arg(42))
            .unwrap();
        assert_eq!(request.url, "http://httpbin.org/users/42/repos");
    }
}
