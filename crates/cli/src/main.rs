//! Greenroot CLI - Browse the tree catalog from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List categories
//! greenroot categories
//!
//! # List every tree, or the trees of one category
//! greenroot products
//! greenroot products --category 3
//!
//! # Interactive session reading commands from stdin
//! greenroot browse
//! greenroot browse --json
//!
//! # Pledge trees
//! greenroot pledge --name "Rahim" --email rahim@example.com --trees 5
//! ```
//!
//! # Commands
//!
//! - `categories` - Fetch and list categories
//! - `products` - Fetch and list product cards
//! - `browse` - Run an interactive storefront session
//! - `pledge` - Validate a donation pledge and print the confirmation

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use greenroot_storefront::{Error, StorefrontConfig};
use greenroot_storefront::telemetry::{init_sentry, init_tracing};

mod commands;

#[derive(Parser)]
#[command(name = "greenroot")]
#[command(author, version, about = "Greenroot tree storefront")]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all categories
    Categories,
    /// List products, optionally filtered by category
    Products {
        /// Category id to filter by
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Start an interactive session reading commands from stdin
    Browse {
        /// Print each frame as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Pledge trees for planting
    Pledge {
        /// Your name
        #[arg(short, long)]
        name: String,

        /// Email address for the confirmation
        #[arg(short, long)]
        email: String,

        /// Number of trees (default 1)
        #[arg(short, long)]
        trees: Option<u32>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Sentry must be initialized before the tracing subscriber
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(cli.log_json);
            Error::from(e).report();
            std::process::exit(1);
        }
    };
    let _sentry_guard = init_sentry(&config);
    init_tracing(cli.log_json);

    if let Err(e) = run(cli, &config).await {
        e.report();
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> greenroot_storefront::Result<()> {
    match cli.command {
        Commands::Categories => commands::catalog::categories(config).await?,
        Commands::Products { category } => {
            commands::catalog::products(config, category.as_deref()).await?;
        }
        Commands::Browse { json } => commands::browse::run(config, json).await?,
        Commands::Pledge {
            name,
            email,
            trees,
        } => commands::pledge::submit(&name, &email, trees)?,
    }
    Ok(())
}
