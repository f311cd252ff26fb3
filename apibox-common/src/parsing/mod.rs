mod client;
mod endpoint;

pub use client::parse_api_client_args;
pub use endpoint::parse_endpoint_args;

use quote::ToTokens;
use syn::LitStr;

use crate::types::ContentType;

fn parse_lit_str(value: &syn::Expr, name: &str) -> syn::Result<LitStr> {
    if let syn::Expr::Lit(syn::ExprLit {
        lit: syn::Lit::Str(lit),
        ..
    }) = value
    {
        Ok(lit.clone())
    } else {
        Err(syn::Error::new_spanned(
            value,
            format!("{name} must be a string literal"),
        ))
    }
}

/// 标识符（`json`）或字符串字面量（`"application/xml"`）
fn parse_content_type_value(value: &syn::Expr) -> syn::Result<ContentType> {
    syn::parse2::<ContentType>(value.to_token_stream())
}

/// 取出标识符或字符串字面量的文本，用于 `method = GET` / `location = headers`
fn parse_word_value(value: &syn::Expr, name: &str) -> syn::Result<String> {
    match value {
        syn::Expr::Path(expr_path) => expr_path
            .path
            .get_ident()
            .map(|ident| ident.to_string())
            .ok_or_else(|| {
                syn::Error::new_spanned(value, format!("{name} must be a simple identifier"))
            }),
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(lit),
            ..
        }) => Ok(lit.value()),
        _ => Err(syn::Error::new_spanned(
            value,
            format!("{name} must be an identifier or a string literal"),
        )),
    }
}
