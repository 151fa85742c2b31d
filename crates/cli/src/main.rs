//! RocketShoes CLI - a terminal front end for the cart.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! rs-cli products
//!
//! # Show the cart
//! rs-cli cart show
//!
//! # Add one unit of product 1
//! rs-cli cart add 1
//!
//! # Set product 1 to three units
//! rs-cli cart update 1 3
//!
//! # Remove product 1
//! rs-cli cart remove 1
//! ```
//!
//! # Commands
//!
//! - `products` - List products from the stock API
//! - `cart` - Show and change the persisted cart
//!
//! Failed cart operations are reported once, through the cart's notifier,
//! and exit with status 1. The cart itself is persisted under
//! `ROCKETSHOES_STORAGE_DIR`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;
use rocketshoes_storefront::config::StorefrontConfig;
use rocketshoes_storefront::CartError;
use rocketshoes_storefront::state::AppState;

mod commands;

#[derive(Parser)]
#[command(name = "rs-cli")]
#[command(author, version, about = "RocketShoes cart CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products from the stock API
    Products,
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart contents and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Update {
        /// Product ID
        product_id: ProductId,

        /// New quantity (values <= 0 are ignored)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        if !already_reported(e.as_ref()) {
            tracing::error!("Command failed: {e}");
        }
        std::process::exit(1);
    }
}

/// Cart failures have already reached the user through the cart's notifier.
fn already_reported(error: &(dyn std::error::Error + 'static)) -> bool {
    error.is::<CartError>()
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Products => commands::products::list(&state).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state),
            CartAction::Add { product_id } => commands::cart::add(&state, product_id).await?,
            CartAction::Remove { product_id } => commands::cart::remove(&state, product_id)?,
            CartAction::Update { product_id, amount } => {
                commands::cart::update(&state, product_id, amount).await?;
            }
        },
    }
    Ok(())
}
