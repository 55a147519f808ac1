//! Imagine Shop CLI - inspect and edit the local cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart with its order summary
//! shop-cli cart show
//!
//! # Add a catalog product to the cart
//! shop-cli cart add 5f4e3d2c1b0a
//!
//! # Remove one cart entry by its item id
//! shop-cli cart remove 2b0c7c1e-5d8f-4c5e-9a53-6f0f3d1c2e11
//!
//! # Empty the cart
//! shop-cli cart clear
//!
//! # List the catalog
//! shop-cli catalog list
//! ```
//!
//! The CLI reads the same configuration as the storefront and works on the
//! same data directory. A running storefront only sees CLI edits after it
//! restarts.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use imagine_shop_storefront::config::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "shop-cli")]
#[command(author, version, about = "Imagine Shop CLI tools")]
struct Cli {
    /// Override `STOREFRONT_DATA_DIR`
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or edit the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the remote catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and order summary
    Show,
    /// Add a product from the catalog
    Add {
        /// Catalog product id
        product_id: String,
    },
    /// Remove one cart entry
    Remove {
        /// Item id shown by `cart show`
        item_id: String,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List every product
    List,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&config).await?,
            CartAction::Add { product_id } => commands::cart::add(&config, &product_id).await?,
            CartAction::Remove { item_id } => commands::cart::remove(&config, &item_id).await?,
            CartAction::Clear => commands::cart::clear(&config).await?,
        },
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list(&config).await?,
        },
    }
    Ok(())
}
