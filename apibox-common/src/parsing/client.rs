use std::collections::HashMap;

use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{LitStr, Meta, MetaList, Path, Token};

use super::{parse_content_type_value, parse_endpoint_args, parse_lit_str, parse_word_value};
use crate::types::{ApiClientArgs, TokenArgs, TokenLocation};

impl Parse for ApiClientArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut base_url = None;
        let mut default_content_type = None;
        let mut timeout = None;
        let mut token = None;
        let mut hook = None;
        let mut endpoints = Vec::new();

        let pairs = Punctuated::<Meta, Token![,]>::parse_terminated(input)?;
        for meta in pairs {
            match meta {
                Meta::NameValue(nv) => {
                    if nv.path.is_ident("base_url") {
                        base_url = Some(parse_base_url_value(&nv.value)?);
                    } else if nv.path.is_ident("default_content_type") {
                        default_content_type = Some(parse_content_type_value(&nv.value)?);
                    } else if nv.path.is_ident("timeout") {
                        timeout = Some(parse_timeout_value(&nv.value)?);
                    } else if nv.path.is_ident("hook") {
                        hook = Some(parse_hook_value(&nv.value)?);
                    } else {
                        return Err(syn::Error::new_spanned(
                            nv.path,
                            "Only 'base_url', 'default_content_type', 'timeout', 'hook', 'token(...)', or 'endpoint(...)' are supported",
                        ));
                    }
                }
                Meta::List(ml) if ml.path.is_ident("token") => {
                    token = Some(parse_token_args(&ml)?);
                }
                Meta::List(ml) if ml.path.is_ident("endpoint") => {
                    endpoints.push(parse_endpoint_args(&ml)?);
                }
                _ => {
                    return Err(syn::Error::new_spanned(
                        meta,
                        "Expected key-value pair, token(...) or endpoint(...)",
                    ));
                }
            }
        }

        let base_url = base_url
            .ok_or_else(|| syn::Error::new(input.span(), "Missing required 'base_url' parameter"))?;
        if endpoints.is_empty() {
            return Err(syn::Error::new(
                input.span(),
                "At least one 'endpoint(...)' is required",
            ));
        }

        // 同一方法路径只能声明一次
        let mut seen: HashMap<&str, &LitStr> = HashMap::new();
        for endpoint in &endpoints {
            if let Some(first) = seen.insert(&endpoint.method_path, &endpoint.uri) {
                return Err(syn::Error::new_spanned(
                    &endpoint.uri,
                    format!(
                        "method path `{}` is already declared by `{}`",
                        endpoint.method_path,
                        first.value()
                    ),
                ));
            }
        }

        Ok(ApiClientArgs {
            base_url,
            default_content_type,
            timeout,
            token,
            hook,
            endpoints,
        })
    }
}

fn parse_base_url_value(value: &syn::Expr) -> syn::Result<LitStr> {
    let lit = parse_lit_str(value, "base_url")?;
    if lit.value().trim_end_matches('/').is_empty() {
        return Err(syn::Error::new_spanned(value, "base_url must not be empty"));
    }
    Ok(lit)
}

/// 秒数，整数或小数
fn parse_timeout_value(value: &syn::Expr) -> syn::Result<f64> {
    let seconds = match value {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Int(lit),
            ..
        }) => lit.base10_parse::<u64>()? as f64,
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Float(lit),
            ..
        }) => lit.base10_parse::<f64>()?,
        _ => {
            return Err(syn::Error::new_spanned(
                value,
                "timeout must be a number of seconds (e.g., 5 or 2.5)",
            ));
        }
    };

    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(syn::Error::new_spanned(value, "timeout must be positive"));
    }
    Ok(seconds)
}

fn parse_hook_value(value: &syn::Expr) -> syn::Result<Path> {
    if let syn::Expr::Path(expr_path) = value {
        Ok(expr_path.path.clone())
    } else {
        Err(syn::Error::new_spanned(value, "hook must be a type path"))
    }
}

/// 解析 `token(location = headers, key = "X-Token", value = "...")`
fn parse_token_args(meta_list: &MetaList) -> syn::Result<TokenArgs> {
    let mut location = None;
    let mut key = None;
    let mut value = None;

    let nested = meta_list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
    for meta in nested {
        if let Meta::NameValue(nv) = meta {
            if nv.path.is_ident("location") {
                let word = parse_word_value(&nv.value, "location")?;
                location = Some(word.parse::<TokenLocation>().map_err(|e| {
                    syn::Error::new_spanned(&nv.value, e.to_string())
                })?);
            } else if nv.path.is_ident("key") {
                let lit = parse_lit_str(&nv.value, "key")?;
                if lit.value().is_empty() {
                    return Err(syn::Error::new_spanned(lit, "`key` in `token` is required"));
                }
                key = Some(lit);
            } else if nv.path.is_ident("value") {
                value = Some(parse_lit_str(&nv.value, "value")?);
            } else {
                return Err(syn::Error::new_spanned(
                    &nv.path,
                    "Only 'location', 'key', or 'value' are supported in token configuration",
                ));
            }
        } else {
            return Err(syn::Error::new_spanned(
                meta,
                "Expected key-value pair in token configuration",
            ));
        }
    }

    let key = key.ok_or_else(|| {
        syn::Error::new_spanned(&meta_list.path, "token configuration must include 'key'")
    })?;

    Ok(TokenArgs {
        location: location.unwrap_or(TokenLocation::Params),
        key,
        value,
    })
}

/// 解析 `#[api_client(...)]` 参数的公共函数
pub fn parse_api_client_args(input: ParseStream) -> syn::Result<ApiClientArgs> {
    ApiClientArgs::parse(input)
}
