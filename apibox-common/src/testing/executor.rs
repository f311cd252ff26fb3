use anyhow::ensure;

use super::RequestArguments;
use crate::transport::{ReqwestTransport, Response, Transport};

/// 执行夹具请求，并要求响应状态码为 200
#[derive(Debug, Default, Clone, Copy)]
pub struct Executor;

impl Executor {
    /// 通过给定的传输层执行
    pub async fn run(
        &self,
        transport: &dyn Transport,
        arguments: &RequestArguments,
    ) -> anyhow::Result<Response> {
        let request = arguments.to_request()?;
        log::info!("[FIXTURE] {arguments}");

        let response = transport.perform(&request).await?;
        log::info!("[RESPONSE] {} {}", response.status, response.preview(100));

        ensure!(
            response.status == 200,
            "{arguments}: expected status 200, got {}",
            response.status
        );
        Ok(response)
    }

    /// 通过默认的 reqwest 传输层执行
    pub async fn execute(&self, arguments: &RequestArguments) -> anyhow::Result<Response> {
        self.run(&ReqwestTransport::default(), arguments).await
    }
}
