use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use storefront_cli::{filter_policies, init_tracing, seed};
use storefront_core::{CatalogStoreKind, Config};
use storefront_db::create_catalog_store;
use storefront_infra::default_subscriptions;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Storefront catalog administration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert the five sample products with random stock counts
    Seed {
        /// Delete every product and stock row first
        #[arg(long)]
        clear: bool,
    },
    /// Delete every product and stock row
    Clear,
    /// Print the SNS filter policies for the price subscriptions
    FilterPolicies,
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn open_store(config: &Config) -> Result<std::sync::Arc<dyn storefront_db::CatalogStore>> {
    if config.catalog_store() == CatalogStoreKind::Memory {
        tracing::warn!("CATALOG_STORE=memory: changes are lost when this command exits");
    }
    create_catalog_store(config, true).await
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Seed { clear } => {
            let config = Config::from_env()?;
            let store = open_store(&config).await?;
            let products = seed(store.as_ref(), &mut rand::rng(), clear).await?;
            print_json(&products)?;
        }
        Commands::Clear => {
            let config = Config::from_env()?;
            let store = open_store(&config).await?;
            store.clear().await?;
            tracing::info!("Catalog cleared");
        }
        Commands::FilterPolicies => {
            print_json(&filter_policies(&default_subscriptions()))?;
        }
    }

    Ok(())
}
