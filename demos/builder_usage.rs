use std::sync::Arc;
use std::time::Duration;

use apibox_common::{
    ApiClient, ApiDeclaration, ApiError, Call, ContentType, EndpointDeclaration, FilePart,
    RawResponse, TokenConfig, TokenLocation,
};
use serde_json::json;

/// 不使用宏，直接以构建器声明端点，并只构建请求不发送
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let api = ApiDeclaration::builder()
        .base_url("https://api.pinboard.in/v1/")
        .default_content_type(ContentType::Json)
        .timeout(Duration::from_secs(5))
        .token(TokenConfig::params("auth_token"))
        .endpoint("/posts/all", EndpointDeclaration::get())
        .endpoint(
            "/posts/recent",
            EndpointDeclaration::get().default_param("count", 10),
        )
        .endpoint(r"/tags/(\w+)/rename", EndpointDeclaration::post())
        .endpoint(
            "/notes/upload",
            EndpointDeclaration::post().content_type(ContentType::Multipart),
        )
        .build()
        .compile()?;

    let mut client: ApiClient<RawResponse> = ApiClient::new(Arc::new(api), Some("user:TOKEN"))?;

    let recent = client.path("posts").segment("recent");
    println!("{recent} declared: {}", recent.is_declared());
    let request = recent.prepare(&Call::new().param("tag", "rust"))?;
    println!("{} {}", request.method, request.full_url());

    let request = client.prepare(
        "tags.rename",
        &Call::new().arg("rust").json(json!({ "new": "rustlang" })),
    )?;
    println!("{} {} {:?}", request.method, request.url, request.body_text());

    let request = client.prepare(
        "notes.upload",
        &Call::new().file(
            "note",
            FilePart::new(b"hello".to_vec())
                .file_name("note.txt")
                .mime("text/plain"),
        ),
    )?;
    println!("{} {} files: {:?}", request.method, request.url, request.files.keys());

    client.set_token_location(TokenLocation::Headers)?;
    let request = client.prepare("posts.all", &Call::new())?;
    println!("{} {} headers: {:?}", request.method, request.full_url(), request.headers);

    for (method_path, call) in [
        ("tags.rename", Call::new()),
        ("tags.rename", Call::new().arg("two words")),
        ("posts.all", Call::new().json(json!({ "a": 1 }))),
        ("posts.delete", Call::new()),
    ] {
        match client.prepare(method_path, &call) {
            Err(ApiError::Configuration(message)) => println!("configuration: {message}"),
            Err(err) => println!("{method_path}: {err}"),
            Ok(request) => println!("{method_path}: unexpected {}", request.url),
        }
    }

    Ok(())
}
