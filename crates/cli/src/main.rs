//! Souk CLI - operator tools for the storefront.
//!
//! # Usage
//!
//! ```bash
//! # Sort a product export into display sections
//! souk allocate --input products.json
//!
//! # Render the sitemap against a live backend
//! souk sitemap --backend-url https://api.souk.ng/api/ --base-url https://souk.ng -o sitemap.xml
//!
//! # Check the backend answers
//! souk backend-health --backend-url https://api.souk.ng/api/
//! ```
//!
//! # Commands
//!
//! - `allocate` - Run the allocation heuristic over a JSON file
//! - `sitemap` - Render `sitemap.xml`
//! - `backend-health` - Check that the marketplace backend is reachable

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "souk")]
#[command(author, version, about = "Souk storefront tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the allocation heuristic over a product list
    Allocate {
        /// JSON file: a product array, or `{ "products": [...], "config": {...} }`
        #[arg(short, long)]
        input: PathBuf,

        /// Reference time for recency scoring (RFC 3339, default: now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,

        /// Print only the section counts
        #[arg(long)]
        stats: bool,
    },
    /// Render the sitemap from the backend catalogue
    Sitemap {
        /// Marketplace backend base URL
        #[arg(long, env = "SOUK_BACKEND_URL")]
        backend_url: String,

        /// Public storefront URL used in `<loc>` entries
        #[arg(long, env = "SOUK_BASE_URL")]
        base_url: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that the marketplace backend is reachable
    BackendHealth {
        /// Marketplace backend base URL
        #[arg(long, env = "SOUK_BACKEND_URL")]
        backend_url: String,
    },
}

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    // Logs go to stderr so command output can be piped
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "souk_cli=info,souk_storefront=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Allocate { input, now, stats } => {
            commands::allocate::run(&input, now.unwrap_or_else(Utc::now), stats)?;
        }
        Commands::Sitemap {
            backend_url,
            base_url,
            output,
        } => {
            commands::sitemap::run(&backend_url, &base_url, output.as_deref()).await?;
        }
        Commands::BackendHealth { backend_url } => {
            commands::backend::health(&backend_url).await?;
        }
    }
    Ok(())
}
