use std::fs;
use std::path::Path;

use anyhow::Context;
use serde_json::{Map, Value};

use super::{Executor, RequestArguments};

const REQUESTS: &str = "requests";

/// 读取并解析夹具文件（YAML，JSON 也是合法的 YAML）
pub fn load_fixture(path: impl AsRef<Path>) -> anyhow::Result<Value> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse fixture {}", path.display()))
}

/// 相对 `current_file` 所在目录读取夹具，返回惰性的请求序列
///
/// 每次调用都重新读取文件。
///
/// ```rust,ignore
/// for (executor, args) in yield_requests(file!(), "data/foo_api_def.yml")? {
///     executor.execute(&args).await?;
/// }
/// ```
pub fn yield_requests(
    current_file: impl AsRef<Path>,
    filename: impl AsRef<Path>,
) -> anyhow::Result<FixtureRequests> {
    let dir = current_file
        .as_ref()
        .parent()
        .unwrap_or_else(|| Path::new(""));
    let document = load_fixture(dir.join(filename))?;
    Ok(expand(document))
}

/// 展开内存中的夹具文档
pub fn expand(document: Value) -> FixtureRequests {
    FixtureRequests {
        stack: vec![(Map::new(), document)],
    }
}

/// 夹具请求序列
///
/// 深度优先遍历文档：节点自身的字段覆盖继承来的字段，
/// 带 `requests` 的节点继续展开子节点，其余节点产出一组请求参数。
/// 只有在迭代时才会展开，不发出任何请求。
#[derive(Debug)]
pub struct FixtureRequests {
    stack: Vec<(Map<String, Value>, Value)>,
}

impl Iterator for FixtureRequests {
    type Item = (Executor, RequestArguments);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((mut arguments, node)) = self.stack.pop() {
            let Value::Object(mut fields) = node else {
                log::warn!("skipping fixture node that is not a mapping: {node}");
                continue;
            };

            match fields.remove(REQUESTS) {
                Some(Value::Array(children)) => {
                    arguments.extend(fields);
                    // 逆序入栈，保证按文档顺序产出
                    for child in children.into_iter().rev() {
                        self.stack.push((arguments.clone(), child));
                    }
                }
                Some(other) => {
                    log::warn!("skipping fixture node whose `requests` is not a list: {other}");
                }
                None => {
                    arguments.extend(fields);
                    return Some((Executor, RequestArguments::new(arguments)));
                }
            }
        }
        None
    }
}
