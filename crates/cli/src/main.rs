//! Shopfront CLI - Session cart management.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart with totals
//! shopfront cart show
//!
//! # Add two units of a product
//! shopfront cart add 1 --name "Premium T-Shirt" --price 29.99 --image /tee.png -q 2
//!
//! # Change or remove a line
//! shopfront cart update 1 3
//! shopfront cart remove 1
//!
//! # Empty the cart, or delete its storage slot entirely
//! shopfront cart clear
//! shopfront cart forget
//! ```
//!
//! Configuration comes from `SHOPFRONT_*` environment variables (see
//! `shopfront_storefront::config`); `--data-dir` and `--key` override them.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use shopfront_storefront::config::LogFormat;
use shopfront_storefront::{AppError, StorefrontConfig, telemetry};

mod commands;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront session cart tools")]
struct Cli {
    /// Directory holding persisted session state
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Storage slot the cart is persisted under
    #[arg(long, global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and modify the session cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show {
        /// Print the cart view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a product to the cart
    Add {
        /// Product ID
        id: String,

        /// Product display name
        #[arg(short, long)]
        name: String,

        /// Unit price
        #[arg(short, long)]
        price: Decimal,

        /// Product image URL or path
        #[arg(short, long, default_value = "")]
        image: String,

        /// Number of units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product's line from the cart
    Remove {
        /// Product ID
        id: String,
    },
    /// Set the quantity of a line (values below 1 are ignored)
    Update {
        /// Product ID
        id: String,

        /// New quantity
        quantity: u32,
    },
    /// Remove every line from the cart
    Clear,
    /// Delete the cart's storage slot
    Forget,
}

fn main() {
    let cli = Cli::parse();

    let config = StorefrontConfig::from_env();
    let log_format = config
        .as_ref()
        .map_or_else(|_| LogFormat::default(), |c| c.log_format);
    // A subscriber already being installed is not fatal for a CLI run
    let _ = telemetry::init(log_format);

    let result = config
        .map_err(AppError::from)
        .and_then(|config| run(cli, config));

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli, mut config: StorefrontConfig) -> Result<(), AppError> {
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(key) = cli.key {
        shopfront_storefront::storage::validate_key(&key)?;
        config.cart_key = key;
    }

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show { json } => commands::cart::show(&config, json),
            CartAction::Add {
                id,
                name,
                price,
                image,
                quantity,
            } => commands::cart::add(&config, id, name, price, image, quantity),
            CartAction::Remove { id } => commands::cart::remove(&config, &id),
            CartAction::Update { id, quantity } => commands::cart::update(&config, &id, quantity),
            CartAction::Clear => commands::cart::clear(&config),
            CartAction::Forget => commands::cart::forget(&config),
        },
    }
}
