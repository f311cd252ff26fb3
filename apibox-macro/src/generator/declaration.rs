use proc_macro2::TokenStream;
use quote::quote;
use apibox_common::{ApiClientArgs, EndpointArgs, TokenArgs};

/// 生成构建 `ApiDeclaration` 的表达式
///
/// 端点按属性中的声明顺序注册。
pub fn generate_declaration(args: &ApiClientArgs) -> TokenStream {
    let base_url = &args.base_url;

    let content_type = args.default_content_type.as_ref().map(|content_type| {
        quote! { .default_content_type(#content_type) }
    });

    let timeout = args.timeout.map(|seconds| {
        quote! { .timeout(::std::time::Duration::from_secs_f64(#seconds)) }
    });

    let token = args.token.as_ref().map(generate_token_config);
    let endpoints = args.endpoints.iter().map(generate_endpoint);

    quote! {
        ::apibox_common::ApiDeclaration::builder()
            .base_url(#base_url)
            #content_type
            #timeout
            #token
            #(#endpoints)*
            .build()
    }
}

fn generate_token_config(token: &TokenArgs) -> TokenStream {
    let location = token.location;
    let key = &token.key;
    let value = token
        .value
        .as_ref()
        .map(|value| quote! { .with_value(#value) });

    quote! {
        .token(::apibox_common::TokenConfig::new(#location, #key) #value)
    }
}

fn generate_endpoint(endpoint: &EndpointArgs) -> TokenStream {
    let uri = &endpoint.uri;
    let method = endpoint.method;
    let content_type = endpoint
        .content_type
        .as_ref()
        .map(|content_type| quote! { .content_type(#content_type) });
    let params = endpoint
        .default_params
        .iter()
        .map(|(key, value)| quote! { .default_param(#key, #value) });
    let headers = endpoint
        .default_headers
        .iter()
        .map(|(key, value)| quote! { .default_header(#key, #value) });

    quote! {
        .endpoint(
            #uri,
            ::apibox_common::EndpointDeclaration::new(#method)
                #content_type
                #(#params)*
                #(#headers)*
        )
    }
}
