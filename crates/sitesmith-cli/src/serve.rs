//! `sitesmith serve`: the streaming HTTP server in the foreground

use anyhow::Result;

use sitesmith_core::{paths, GeneratorConfig};

/// Run the serve command.
pub async fn run(port: u16) -> Result<()> {
    let config = GeneratorConfig::load()?;

    print_banner(port);
    if config.api_key.is_none() {
        println!("  No API key found. Set ANTHROPIC_API_KEY or add api_key to");
        println!("  {}\n", paths::config_file().display());
    } else {
        println!("  Model:  {}\n", config.model);
    }

    // Initialize tracing for server mode (stdout, not file)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let server = sitesmith_server::start_server(sitesmith_server::ServerConfig { port, config });

    tokio::select! {
        result = server => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\n  Shutting down...");
        }
    }

    Ok(())
}

fn print_banner(port: u16) {
    println!();
    println!("  \x1b[1;36mSiteSmith\x1b[0m server starting");
    println!("  ─────────────────────────────────────");
    println!("  Local:  http://localhost:{}", port);
    println!("  POST /api/generate streams events as SSE");
}
