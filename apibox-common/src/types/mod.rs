pub mod args;
pub mod endpoint;
pub mod http;
pub mod token;

pub use args::{ApiClientArgs, EndpointArgs, TokenArgs};
pub use endpoint::EndpointDeclaration;
pub use http::{ContentType, HttpMethod, MULTIPART_BOUNDARY};
pub use token::{TokenConfig, TokenLocation};
