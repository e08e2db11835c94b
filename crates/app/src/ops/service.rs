use std::net::SocketAddr;

use clap::Args;

use service::spawn_service;

#[derive(Args, Debug, Clone)]
pub struct Service {
    /// Address to serve the webhook on (overrides LISTEN_ADDR)
    #[arg(long)]
    pub listen_addr: Option<SocketAddr>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {}

#[async_trait::async_trait]
impl crate::op::Op for Service {
    type Error = ServiceError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut config = ctx.config.clone();
        if let Some(listen_addr) = self.listen_addr {
            config.listen_addr = listen_addr;
        }

        spawn_service(&config).await;
        Ok("service ended".to_string())
    }
}
