//! `#[api_client]` 属性宏
//!
//! ```rust,ignore
//! use apibox_macro::api_client;
//!
//! #[api_client(
//!     base_url = "https://api.pinboard.in/v1",
//!     token(location = params, key = "auth_token"),
//!     endpoint(uri = "/posts/all", method = GET),
//!     endpoint(uri = "/posts/recent", method = GET, default_param = "count=10"),
//! )]
//! pub struct PinboardApi;
//!
//! let api = PinboardApi::with_token("user:TOKEN")?;
//! let response = api.posts_all().send().await?;
//! ```

mod generator;

use crate::generator::generate_api_client_impl;
use apibox_common::parse_api_client_args;
use proc_macro::TokenStream;
use syn::{ItemStruct, parse_macro_input};

#[proc_macro_attribute]
pub fn api_client(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    let args = parse_macro_input!(args with parse_api_client_args);

    match generate_api_client_impl(input, &args) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}
