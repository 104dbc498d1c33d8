//! SiteSmith - websites from a single prompt
//!
//! - `sitesmith generate` runs one generation and writes the pages to disk
//! - `sitesmith serve` starts the streaming HTTP server

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use sitesmith_core::paths;

mod generate;
mod serve;

/// SiteSmith - AI Website Generator
#[derive(Parser)]
#[command(name = "sitesmith")]
#[command(about = "Generate multi-page websites from a single prompt", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a website and write it to a directory
    ///
    /// Progress is printed as it happens. Pages and the site plan
    /// (site.json) are written only when generation completes.
    Generate {
        /// What to build, or what to change when revising
        prompt: String,

        /// Output directory
        #[arg(short, long, default_value = "site")]
        out: PathBuf,

        /// Existing site plan (site.json) to revise
        #[arg(long)]
        spec: Option<PathBuf>,

        /// Directory of existing .html pages to revise
        #[arg(long)]
        pages: Option<PathBuf>,
    },

    /// Start the SiteSmith HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = sitesmith_server::DEFAULT_PORT)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Serve mode has its own logging (stdout)
        Commands::Serve { port } => serve::run(port).await,
        Commands::Generate {
            prompt,
            out,
            spec,
            pages,
        } => {
            init_file_logging();
            let args = generate::GenerateArgs {
                prompt,
                out,
                spec,
                pages,
            };
            if !generate::run(args).await? {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

/// Log to file so progress output stays readable.
fn init_file_logging() {
    let log_dir = paths::logs_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create log directory: {}", e);
    }

    let log_file = match std::fs::File::create(paths::log_file()) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to create log file: {}, logging disabled", e);
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
}
