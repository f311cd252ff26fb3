use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::multipart::{Form, Part};

use super::{Response, Transport};
use crate::request::PreparedRequest;

/// 基于 reqwest 的默认传输实现
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自定义的 reqwest 客户端（代理、TLS 等）
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn perform(&self, request: &PreparedRequest) -> anyhow::Result<Response> {
        let multipart = !request.files.is_empty();

        let mut builder = self
            .client
            .request(request.method.to_reqwest(), &request.url);

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }

        for (key, value) in &request.headers {
            // multipart 的 boundary 由 reqwest 生成
            if multipart && key.eq_ignore_ascii_case("content-type") {
                continue;
            }
            builder = builder.header(key.as_str(), value.as_str());
        }

        if multipart {
            builder = builder.multipart(build_form(request)?);
        } else if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let headers = collect_headers(response.headers());
        let content = response.bytes().await?;

        Ok(Response {
            status,
            content,
            headers,
            url,
        })
    }
}

/// 响应头按小写键收集，重复出现的头（如 `Set-Cookie`）以 `, ` 连接
fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (key, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        collected
            .entry(key.as_str().to_string())
            .and_modify(|joined| {
                joined.push_str(", ");
                joined.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    collected
}

/// 将文件和请求体字段组装为 multipart 表单
///
/// JSON 请求体整体作为 `data` 字段；其余请求体按表单编码拆成文本字段。
fn build_form(request: &PreparedRequest) -> anyhow::Result<Form> {
    let mut form = Form::new();

    if let Some(body) = &request.body {
        let is_json = request
            .header("content-type")
            .is_some_and(|ct| ct.starts_with("application/json"));
        if is_json {
            form = form.text("data", String::from_utf8_lossy(body).into_owned());
        } else {
            for (key, value) in url::form_urlencoded::parse(body) {
                form = form.text(key.into_owned(), value.into_owned());
            }
        }
    }

    for (field, file) in &request.files {
        let mut part = Part::bytes(file.content.clone());
        if let Some(file_name) = &file.file_name {
            part = part.file_name(file_name.clone());
        }
        if let Some(mime) = &file.mime {
            part = part.mime_str(mime)?;
        }
        form = form.part(field.clone(), part);
    }

    Ok(form)
}
