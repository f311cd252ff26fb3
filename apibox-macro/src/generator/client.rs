use proc_macro2::TokenStream;
use quote::quote;
use apibox_common::ApiClientArgs;
use syn::ItemStruct;

use super::{generate_accessors, generate_declaration};

/// 生成 API 客户端的实现代码
///
/// 此函数为使用 `#[api_client]` 宏标注的结构体生成相应的实现代码：
/// 把结构体改写为包装 `ApiClient` 的类型，生成声明、编译缓存、
/// 构造函数以及每个端点的访问方法。
///
/// # 参数
///
/// * `input` - 输入的结构体定义
/// * `args` - `#[api_client(...)]` 的参数
///
/// # 返回值
///
/// 生成的 TokenStream，包含结构体定义和实现
pub fn generate_api_client_impl(
    mut input: ItemStruct,
    args: &ApiClientArgs,
) -> Result<TokenStream, syn::Error> {
    // 确保结构体是空的（无字段、无泛型）
    if !matches!(input.fields, syn::Fields::Unit) {
        return Err(syn::Error::new_spanned(
            &input,
            "api_client macro only supports empty structs (e.g., `struct PinboardApi;`)",
        ));
    }
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "api_client macro does not support generic structs",
        ));
    }

    let hook = args
        .hook
        .as_ref()
        .map(|path| quote! { #path })
        .unwrap_or_else(|| quote! { ::apibox_common::RawResponse });

    input.fields = syn::Fields::Named(syn::parse_quote! {{
        inner: ::apibox_common::ApiClient<#hook>,
    }});

    let struct_name = &input.ident;
    let declaration = generate_declaration(args);
    let accessors = generate_accessors(args, &hook)?;

    let expanded = quote! {
        #input

        impl #struct_name {
            /// 端点声明
            pub fn declaration() -> ::apibox_common::ApiDeclaration {
                #declaration
            }

            /// 编译后的端点表，首次调用时编译，之后所有实例共享
            pub fn compiled() -> ::apibox_common::Result<::std::sync::Arc<::apibox_common::CompiledApi>> {
                static COMPILED: ::std::sync::OnceLock<::std::sync::Arc<::apibox_common::CompiledApi>> =
                    ::std::sync::OnceLock::new();

                if let Some(api) = COMPILED.get() {
                    return Ok(::std::sync::Arc::clone(api));
                }
                let api = ::std::sync::Arc::new(Self::declaration().compile()?);
                Ok(::std::sync::Arc::clone(COMPILED.get_or_init(|| api)))
            }

            /// 使用声明中的 token（如果有）创建客户端
            pub fn new() -> ::apibox_common::Result<Self> {
                Self::from_token(None)
            }

            /// 使用调用方提供的 token 创建客户端
            pub fn with_token(token: &str) -> ::apibox_common::Result<Self> {
                Self::from_token(Some(token))
            }

            pub fn from_token(token: Option<&str>) -> ::apibox_common::Result<Self> {
                let api = Self::compiled()?;
                Ok(Self {
                    inner: ::apibox_common::ApiClient::new(api, token)?,
                })
            }

            /// 替换传输层（链式调用）
            pub fn with_transport(
                self,
                transport: ::std::sync::Arc<dyn ::apibox_common::Transport>,
            ) -> Self {
                Self {
                    inner: self.inner.with_transport(transport),
                }
            }

            pub fn into_inner(self) -> ::apibox_common::ApiClient<#hook> {
                self.inner
            }

            #accessors
        }

        impl ::std::ops::Deref for #struct_name {
            type Target = ::apibox_common::ApiClient<#hook>;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }

        impl ::std::ops::DerefMut for #struct_name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.inner
            }
        }
    };

    Ok(expanded)
}
