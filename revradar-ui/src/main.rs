//! revradar-ui - ReviewRadar terminal front end
//!
//! Submits a product search to the analysis backend and prints each
//! published session state until the result settles. Optionally chains
//! into one of the suggested similar products.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use revradar_common::config::{default_config_path, TomlConfig};
use revradar_common::events::EventBus;
use revradar_ui::config::ClientSettings;
use revradar_ui::front_end::{self, OutputFormat};
use revradar_ui::{AnalysisSession, HttpAnalysisBackend};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Command-line arguments for revradar-ui
#[derive(Parser, Debug)]
#[command(name = "revradar-ui")]
#[command(about = "Reddit review analysis front end for ReviewRadar")]
#[command(version)]
struct Args {
    /// Analysis backend base URL (overrides REVRADAR_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// TOML config file (default: <config dir>/revradar/config.toml)
    #[arg(long, global = true, env = "REVRADAR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze Reddit reviews for a product
    Analyze {
        /// Product name to search for
        query: String,

        /// After the result settles, chain into the N-th similar product (1-based)
        #[arg(long, value_name = "N")]
        follow: Option<usize>,

        /// Print session snapshots as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check that the analysis backend is reachable
    Health,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Read before the subscriber exists: the file supplies the default log level
    let config_path = args.config.clone().or_else(default_config_path);
    let toml_config = TomlConfig::load_or_default(config_path.as_deref()).context("Failed to load config")?;

    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&toml_config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting ReviewRadar front end (revradar-ui) v{}",
        env!("CARGO_PKG_VERSION")
    );
    match &config_path {
        Some(path) if path.is_file() => info!("Using config file {}", path.display()),
        Some(path) => info!("No config file at {}, using defaults", path.display()),
        None => info!("No config directory available, using defaults"),
    }

    let settings = ClientSettings::from_toml(args.api_url.as_deref(), &toml_config)?;
    let backend = Arc::new(HttpAnalysisBackend::from_settings(&settings)?);

    match args.command {
        Command::Health => run_health(&backend).await,
        Command::Analyze { query, follow, json } => {
            let format = if json { OutputFormat::Json } else { OutputFormat::Text };
            let session = AnalysisSession::new(backend, EventBus::new(64));
            let mut stdout = std::io::stdout().lock();

            front_end::run_analyze(&session, &query, follow, format, &mut stdout).await?;
            Ok(())
        }
    }
}

async fn run_health(backend: &HttpAnalysisBackend) -> Result<()> {
    let health = backend
        .health()
        .await
        .map_err(|e| anyhow!("{} ({})", e.user_message(), e))?;

    println!("{}: {}", backend.base_url(), health.status);
    if let Some(message) = health.message {
        println!("{}", message);
    }
    Ok(())
}
