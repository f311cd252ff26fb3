use std::collections::HashMap;

use heck::ToSnakeCase;
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use apibox_common::{ApiClientArgs, EndpointArgs};

/// 宏在客户端类型上生成的固定方法名
pub const RESERVED_NAMES: &[&str] = &[
    "declaration",
    "compiled",
    "new",
    "with_token",
    "from_token",
    "with_transport",
    "into_inner",
];

/// 为每个端点生成一个返回 `ResourcePath` 的访问方法
///
/// 方法名取方法路径的 snake_case 形式（`posts.all` → `posts_all`），
/// 关键字使用原始标识符；无法成为标识符的路径不生成访问方法，
/// 仍可通过 `path(..)` 调用。
pub fn generate_accessors(args: &ApiClientArgs, hook: &TokenStream) -> syn::Result<TokenStream> {
    let mut seen: HashMap<String, &EndpointArgs> = HashMap::new();
    let mut accessors = Vec::new();

    for endpoint in &args.endpoints {
        let name = endpoint.method_path.to_snake_case();
        let Some(ident) = accessor_ident(&name) else {
            continue;
        };

        if RESERVED_NAMES.contains(&name.as_str()) {
            return Err(syn::Error::new_spanned(
                &endpoint.uri,
                format!("accessor `{name}` for `{}` collides with a generated method", endpoint.method_path),
            ));
        }
        if let Some(first) = seen.insert(name.clone(), endpoint) {
            return Err(syn::Error::new_spanned(
                &endpoint.uri,
                format!(
                    "accessor `{name}` is generated for both `{}` and `{}`",
                    first.method_path, endpoint.method_path
                ),
            ));
        }

        accessors.push(generate_accessor(&ident, endpoint, hook));
    }

    Ok(quote! { #(#accessors)* })
}

fn generate_accessor(ident: &Ident, endpoint: &EndpointArgs, hook: &TokenStream) -> TokenStream {
    let mut names = endpoint.method_path.split('.');
    let first = names.next().unwrap_or_default();
    let rest: Vec<&str> = names.collect();
    let doc = format!("`{} {}`", endpoint.method, endpoint.uri.value());

    quote! {
        #[doc = #doc]
        pub fn #ident(&self) -> ::apibox_common::ResourcePath<'_, #hook> {
            self.inner.path(#first) #(.segment(#rest))*
        }
    }
}

fn accessor_ident(name: &str) -> Option<Ident> {
    if syn::parse_str::<Ident>(name).is_ok() {
        return Some(Ident::new(name, Span::call_site()));
    }
    // 关键字（`type`、`match` ...）
    syn::parse_str::<Ident>(&format!("r#{name}"))
        .ok()
        .map(|_| Ident::new_raw(name, Span::call_site()))
}
