mod catalog;
mod search;

use clap::{Parser, Subcommand};
use storefront_api::CatalogClient;
use tracing_subscriber::EnvFilter;

use crate::search::SearchArgs;

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Browse the storefront product catalog")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search products with server-side filters and client-side refinement
    Search(SearchArgs),
    /// List categories and brands
    Catalog,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("storefront-cli: run `search` or `catalog` (see --help)");
        return Ok(());
    };

    let config = storefront_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = CatalogClient::new(&config)
        .map_err(|e| anyhow::anyhow!("failed to build catalog client: {e}"))?;

    match command {
        Commands::Search(args) => search::run_search(client, &config, &args).await,
        Commands::Catalog => catalog::run_catalog(&client).await,
    }
}
