use anyhow::Result;
use clap::Parser;
use rmcp::transport::sse_server::SseServer;
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use rmcp::{ServiceExt, transport::stdio};

mod cli;
mod config;
mod format;
mod gitlab;
mod logging;
mod service;
mod types;

use cli::Cli;
use config::Config;
use service::GitLabService;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    tracing::info!(api_base = %config.api_base, "Starting gitlab-mcp server");

    match cli.transport.as_str() {
        "stdio" => {
            tracing::info!("Starting gitlab-mcp with stdio transport");
            let service = GitLabService::new(config)?
                .serve(stdio())
                .await
                .inspect_err(|e| {
                    tracing::error!("Serving error: {:?}", e);
                })?;
            service.waiting().await?;
        }
        "sse" => {
            tracing::info!(
                "Starting gitlab-mcp with SSE transport at {}",
                cli.bind_address
            );
            let ct = SseServer::serve(cli.bind_address.parse()?)
                .await?
                .with_service(move || {
                    GitLabService::new(config.clone()).expect("Failed to create GitLab service")
                });

            tokio::signal::ctrl_c().await?;
            ct.cancel();
        }
        "streamable-http" => {
            tracing::info!(
                "Starting gitlab-mcp with streamable-http transport at {}/mcp",
                cli.bind_address
            );
            let service = StreamableHttpService::new(
                move || GitLabService::new(config.clone()).map_err(std::io::Error::other),
                LocalSessionManager::default().into(),
                Default::default(),
            );

            let router = axum::Router::new().nest_service("/mcp", service);
            let listener = tokio::net::TcpListener::bind(&cli.bind_address).await?;
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                    tracing::info!("Received Ctrl+C, shutting down gitlab-mcp server...");
                })
                .await?;
        }
        _ => unreachable!(),
    }

    Ok(())
}
