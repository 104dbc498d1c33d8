//! SiteSmith Server binary

use sitesmith_core::GeneratorConfig;
use sitesmith_server::{start_server, ServerConfig, DEFAULT_PORT};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = GeneratorConfig::load()?;
    let port = match std::env::var("PORT") {
        Ok(value) => value.parse()?,
        Err(_) => DEFAULT_PORT,
    };

    start_server(ServerConfig { port, config }).await
}
