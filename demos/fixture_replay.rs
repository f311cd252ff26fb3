use std::env;

use apibox_common::testing::{FixtureRequests, expand, load_fixture};

/// 回放夹具中的请求
///
/// 默认读取本 crate 下的 `fixtures/httpbin.yml`，也可以在命令行传入夹具路径。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = env::args().nth(1).unwrap_or_else(|| {
        concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/httpbin.yml").to_string()
    });
    let requests: FixtureRequests = expand(load_fixture(path)?);

    let mut failures = 0;
    for (executor, arguments) in requests {
        match executor.execute(&arguments).await {
            Ok(response) => println!("ok   {arguments} -> {}", response.status),
            Err(err) => {
                failures += 1;
                println!("fail {arguments} -> {err:#}");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} fixture request(s) failed");
    }
    Ok(())
}
