//! apibox 运行时
//!
//! 声明式 HTTP API 客户端的运行时部分：URI 模式编译、请求构建、
//! 资源路径、客户端与传输层，以及夹具回放的测试辅助。
//! `#[api_client]` 宏生成的代码只依赖这里导出的类型。

pub mod call;
pub mod client;
pub mod declaration;
pub mod error;
pub mod hook;
pub mod parsing;
pub mod path;
pub mod pattern;
pub mod request;
pub mod testing;
pub mod transport;
pub mod types;

pub use call::{Call, FilePart, Payload};
pub use client::ApiClient;
pub use declaration::{ApiDeclaration, ApiDeclarationBuilder, CompiledApi};
pub use error::{ApiError, Result, TransportError};
pub use hook::{JsonBody, RawResponse, ResponseHook, TextBody};
pub use parsing::{parse_api_client_args, parse_endpoint_args};
pub use path::ResourcePath;
pub use pattern::{CompiledMethodDef, CompiledUri, compile_uri};
pub use request::{PreparedRequest, RequestBuilder};
pub use transport::{ReqwestTransport, Response, Transport};
pub use types::{
    ApiClientArgs, ContentType, EndpointArgs, EndpointDeclaration, HttpMethod, TokenArgs,
    TokenConfig, TokenLocation,
};
