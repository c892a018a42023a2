//! Comptoir CLI - Storefront and admin console over the backend API.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalogue
//! comptoir products list --sort-by price --sort-order asc
//!
//! # Fill an anonymous cart, then check out
//! comptoir cart add <product-id> -q 2
//! comptoir orders create --address "Rue 10, Dakar"
//!
//! # Sign in; later commands run as that user
//! comptoir auth login -e awa@boutique.sn
//!
//! # Admin
//! comptoir admin dashboard
//! ```
//!
//! # Commands
//!
//! - `auth` - Sign in, register, sign out, profile
//! - `products` / `categories` - Catalogue browsing
//! - `cart` - Cart of the signed-in user or anonymous session
//! - `orders` - Checkout and order history
//! - `admin` - Dashboard, orders, users, products and categories
//!
//! Session state (tokens, user, anonymous session id) is kept in a JSON
//! file between runs (`COMPTOIR_SESSION_FILE`, default
//! `.comptoir-session.json`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use comptoir_client::{ApiClient, FileStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

use commands::admin::AdminCommand;
use commands::auth::AuthCommand;
use commands::cart::CartCommand;
use commands::catalog::{CategoriesCommand, ProductsCommand};
use commands::orders::OrdersCommand;
use config::{CliConfig, LogFormat};
use output::Printer;

#[derive(Parser)]
#[command(name = "comptoir")]
#[command(author, version, about = "Comptoir storefront and admin console")]
struct Cli {
    /// Backend base URL (overrides `COMPTOIR_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides `COMPTOIR_SESSION_FILE`)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign out and profile
    Auth {
        #[command(subcommand)]
        action: AuthCommand,
    },
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductsCommand,
    },
    /// Browse categories
    Categories {
        #[command(subcommand)]
        action: CategoriesCommand,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
    /// Check out and view orders
    Orders {
        #[command(subcommand)]
        action: OrdersCommand,
    },
    /// Admin console
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },
}

fn init_tracing(format: LogFormat) {
    // Defaults to info for the console and warn for the client library
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "comptoir=info,comptoir_client=warn".into());

    // Logs go to stderr so that stdout only carries command output
    let json_layer = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (format == LogFormat::Text)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = CliConfig::from_env();

    init_tracing(
        config
            .as_ref()
            .map_or(LogFormat::Text, |config| config.log_format),
    );

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mut config: CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(api_url) = cli.api_url {
        config.client.base_url = api_url;
    }
    let session_file = cli.session_file.unwrap_or(config.session_file);
    tracing::debug!(path = %session_file.display(), "using session file");

    let client = ApiClient::new(config.client, Arc::new(FileStore::new(session_file)))?;
    let printer = Printer::new(cli.json);

    match cli.command {
        Commands::Auth { action } => commands::auth::run(&client, printer, action).await?,
        Commands::Products { action } => {
            commands::catalog::run_products(&client, printer, action).await?;
        }
        Commands::Categories { action } => {
            commands::catalog::run_categories(&client, printer, action).await?;
        }
        Commands::Cart { action } => commands::cart::run(&client, printer, action).await?,
        Commands::Orders { action } => commands::orders::run(&client, printer, action).await?,
        Commands::Admin { action } => commands::admin::run(&client, printer, action).await?,
    }
    Ok(())
}
