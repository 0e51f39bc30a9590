//! Tenderbid - main entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tenderbid::config::Config;
use tenderbid::ingest;
use tenderbid::server::{self, AppState};
use tenderbid::store::{JsonStore, Store};

#[derive(Parser, Debug)]
#[command(name = "tenderbid")]
#[command(about = "Tender matching and bid recommendation service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Override the data directory (TENDERBID_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Run the HTTP service (default).
    Serve,
    /// Load a catalog CSV into the store without going through the API.
    Import {
        /// Path to the catalog CSV file.
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env if present
    let _ = dotenvy::dotenv();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tenderbid=info,tower_http=debug"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut config = Config::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    let store = Arc::new(JsonStore::open(&config.storage.data_dir).await?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Import { file } => {
            let bytes = tokio::fs::read(&file).await?;
            let products = ingest::parse_catalog_csv(&bytes)?;
            let count = store.replace_products(products).await?;
            tracing::info!(count, file = %file.display(), "Catalog imported");
            Ok(())
        }
        Command::Serve => {
            tracing::info!("Starting tenderbid v{}", env!("CARGO_PKG_VERSION"));
            let state = Arc::new(AppState::new(store));
            server::serve(&config.server, state).await?;
            Ok(())
        }
    }
}
