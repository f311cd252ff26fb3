use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use apibox_common::{ApiClient, Call, RawResponse, TokenLocation};
use apibox_macro::api_client;
use serde::Deserialize;
use serde_json::json;

/// httpbin.org 的部分端点
#[api_client(
    base_url = "http://httpbin.org",
    default_content_type = json,
    timeout = 10,
    token(location = headers, key = "X-Api-Token", value = "demo-token"),
    endpoint(uri = "/get", method = GET, default_param = "a=b"),
    endpoint(uri = "/post", method = POST, default_header = "X-Client: apibox"),
    endpoint(uri = r"/anything/(\w+)/items", method = PUT),
    endpoint(uri = r"/status/(\d{3})", method = GET),
)]
struct HttpBin;

/// httpbin 回显的请求
#[derive(Debug, Deserialize)]
struct Echo {
    #[serde(default)]
    args: HashMap<String, String>,
    #[serde(default)]
    headers: HashMap<String, String>,
    #[serde(default)]
    json: Option<serde_json::Value>,
    url: String,
}

/// `APIBOX_BASE_URL` 覆盖声明中的地址，`APIBOX_TOKEN` 覆盖默认 token
fn client_from_env() -> anyhow::Result<ApiClient<RawResponse>> {
    let token = env::var("APIBOX_TOKEN").ok();

    let client = match env::var("APIBOX_BASE_URL") {
        Ok(base_url) => {
            let mut declaration = HttpBin::declaration();
            declaration.base_url = base_url;
            ApiClient::new(Arc::new(declaration.compile()?), token.as_deref())?
        }
        Err(_) => HttpBin::from_token(token.as_deref())?.into_inner(),
    };
    Ok(client)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // 访问方法只构建路径，不发请求
    let bin = HttpBin::new()?;
    println!("{}", bin.anything_items());
    println!("{}", bin.status());

    let mut client = client_from_env()?;

    let response = client.path("get").call(Call::new().param("c", 1)).await?;
    let echo: Echo = response.json()?;
    println!("GET {} -> args {:?}", echo.url, echo.args);

    let response = client
        .path("post")
        .call(Call::new().json(json!({ "name": "apibox" })))
        .await?;
    let echo: Echo = response.json()?;
    println!("POST {} -> json {:?}", echo.url, echo.json);

    let response = client
        .path("anything")
        .segment("items")
        .call(Call::new().arg("books").json(json!({ "count": 3 })))
        .await?;
    let echo: Echo = response.json()?;
    println!("PUT {} -> token header {:?}", echo.url, echo.headers.get("X-Api-Token"));

    // 之后的请求把 token 放在查询参数中
    client.set_token_location(TokenLocation::Params)?;
    let response = client.path("get").send().await?;
    let echo: Echo = response.json()?;
    println!("GET {} -> args {:?}", echo.url, echo.args);

    let response = client.path("status").call(Call::new().arg(418)).await?;
    println!("status {}", response.status);

    if let Err(err) = client.path("status").call(Call::new().arg("teapot")).await {
        log::warn!("rejected before sending: {err}");
    }

    Ok(())
}
