//! 测试辅助
//!
//! - [`yield_requests`] / [`expand`]：按 YAML 夹具文档逐个展开请求，
//!   得到 `(Executor, RequestArguments)`，由测试代码驱动执行。
//! - [`MockTransport`]：记录请求并返回预设响应的内存传输层。
//!
//! 夹具文档示例：
//!
//! ```yaml
//! base_url: 'http://127.0.0.1:8000'
//! requests:
//!     - uri: /api/foo
//!       method: POST
//!       requests:
//!           - data:
//!               key-a: v-a
//!           - data:
//!               key-A: v-A
//!     - uri: /api/bar
//!       method: GET
//!       requests:
//!           - params:
//!               query-a: v-a
//! ```

mod arguments;
mod executor;
mod fixture;
mod mock;

pub use arguments::RequestArguments;
pub use executor::Executor;
pub use fixture::{FixtureRequests, expand, load_fixture, yield_requests};
pub use mock::MockTransport;
