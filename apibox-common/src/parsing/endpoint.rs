use syn::punctuated::Punctuated;
use syn::{LitStr, Meta, MetaList, Token};

use super::{parse_content_type_value, parse_lit_str, parse_word_value};
use crate::pattern::compile_uri;
use crate::types::{EndpointArgs, HttpMethod};

/// 解析 `endpoint(uri = "...", method = GET, ...)`
///
/// URI 在这里就完成编译，非法的捕获正则或没有字面段的 URI
/// 直接作为编译错误报告在 `uri` 上。
pub fn parse_endpoint_args(list: &MetaList) -> syn::Result<EndpointArgs> {
    let mut uri = None;
    let mut method = None;
    let mut content_type = None;
    let mut default_params = Vec::new();
    let mut default_headers = Vec::new();

    let nested = list.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
    for meta in nested {
        let nv = match meta {
            Meta::NameValue(nv) => nv,
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "expected key-value pair in endpoint",
                ));
            }
        };

        if nv.path.is_ident("uri") {
            uri = Some(parse_lit_str(&nv.value, "uri")?);
        } else if nv.path.is_ident("method") {
            method = Some(parse_method_value(&nv.value)?);
        } else if nv.path.is_ident("content_type") {
            content_type = Some(parse_content_type_value(&nv.value)?);
        } else if nv.path.is_ident("default_param") {
            let lit = parse_lit_str(&nv.value, "default_param")?;
            default_params.push(split_pair(&lit, '=', "default_param = \"key=value\"")?);
        } else if nv.path.is_ident("default_header") {
            let lit = parse_lit_str(&nv.value, "default_header")?;
            default_headers.push(split_pair(&lit, ':', "default_header = \"Name: value\"")?);
        } else {
            return Err(syn::Error::new_spanned(
                nv.path,
                "Only 'uri', 'method', 'content_type', 'default_param', and 'default_header' are supported in endpoint",
            ));
        }
    }

    let uri = uri.ok_or_else(|| {
        syn::Error::new_spanned(&list.path, "endpoint must include 'uri'")
    })?;
    let method = method.ok_or_else(|| {
        syn::Error::new_spanned(&list.path, "endpoint must include 'method'")
    })?;
    let compiled =
        compile_uri(&uri.value()).map_err(|e| syn::Error::new_spanned(&uri, e.to_string()))?;

    Ok(EndpointArgs {
        uri,
        method_path: compiled.method_path,
        method,
        content_type,
        default_params,
        default_headers,
    })
}

fn parse_method_value(value: &syn::Expr) -> syn::Result<HttpMethod> {
    parse_word_value(value, "method")?
        .parse()
        .map_err(|e: crate::error::ApiError| syn::Error::new_spanned(value, e.to_string()))
}

/// 按第一个分隔符拆成 (键, 值)，两边去掉空白
fn split_pair(lit: &LitStr, separator: char, usage: &str) -> syn::Result<(String, String)> {
    let text = lit.value();
    match text.split_once(separator) {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(syn::Error::new_spanned(lit, format!("expected {usage}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentType;
    use syn::parse_quote;

    #[test]
    fn test_parse_endpoint() {
        let list: MetaList = parse_quote! {
            endpoint(
                uri = r"/get/(\w+)/wtf",
                method = GET,
                content_type = json,
                default_param = "a=b",
                default_header = "X-Client: apibox"
            )
        };
        let args = parse_endpoint_args(&list).unwrap();

        assert_eq!(args.uri.value(), r"/get/(\w+)/wtf");
        assert_eq!(args.method_path, "get.wtf");
        assert_eq!(args.method, HttpMethod::Get);
        assert_eq!(args.content_type, Some(ContentType::Json));
        assert_eq!(args.default_params, vec![("a".to_string(), "b".to_string())]);
        assert_eq!(
            args.default_headers,
            vec![("X-Client".to_string(), "apibox".to_string())]
        );
    }

    #[test]
    fn test_method_as_string_and_raw_content_type() {
        let list: MetaList = parse_quote! {
            endpoint(uri = "/xml", method = "put", content_type = "application/xml")
        };
        let args = parse_endpoint_args(&list).unwrap();
        assert_eq!(args.method, HttpMethod::Put);
        assert_eq!(
            args.content_type,
            Some(ContentType::Raw("application/xml".to_string()))
        );
    }

    #[test]
    fn test_missing_uri_or_method() {
        let list: MetaList = parse_quote! { endpoint(method = GET) };
        let err = parse_endpoint_args(&list).err().unwrap();
        assert!(err.to_string().contains("'uri'"));

        let list: MetaList = parse_quote! { endpoint(uri = "/get") };
        let err = parse_endpoint_args(&list).err().unwrap();
        assert!(err.to_string().contains("'method'"));
    }

    #[test]
    fn test_invalid_values() {
        let list: MetaList = parse_quote! { endpoint(uri = "/get", method = FETCH) };
        assert!(parse_endpoint_args(&list).is_err());

        let list: MetaList = parse_quote! { endpoint(uri = "/(\\d+)", method = GET) };
        assert!(parse_endpoint_args(&list).is_err());

        let list: MetaList = parse_quote! { endpoint(uri = "/get", method = GET, default_param = "novalue") };
        assert!(parse_endpoint_args(&list).is_err());

        let list: MetaList = parse_quote! { endpoint(uri = "/get", method = GET, retry = 3) };
        assert!(parse_endpoint_args(&list).is_err());
    }
}
