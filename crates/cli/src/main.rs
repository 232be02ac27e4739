//! Rocket Shoes CLI - drive the shopping cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! rs-cli show
//!
//! # Add one unit of product 3
//! rs-cli add 3
//!
//! # Set product 3 to two units
//! rs-cli update 3 2
//!
//! # Remove product 3
//! rs-cli remove 3
//!
//! # Inspect the catalog
//! rs-cli stock 3
//! rs-cli product 3
//! ```
//!
//! # Commands
//!
//! - `show`, `add`, `remove`, `update`, `clear` - Cart operations
//! - `stock`, `product` - Catalog lookups

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rocket_shoes_core::ProductId;
use rocket_shoes_storefront::config::StorefrontConfig;
use rocket_shoes_storefront::notice::MemoryNotifier;
use rocket_shoes_storefront::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rs-cli")]
#[command(author, version, about = "Rocket Shoes cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
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
    /// Set the amount of a product already in the cart
    Update {
        /// Product ID
        product_id: ProductId,

        /// New amount
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Delete the stored cart
    Clear,
    /// Show the available stock of a product
    Stock {
        /// Product ID
        product_id: ProductId,
    },
    /// Show a product record from the catalog
    Product {
        /// Product ID
        product_id: ProductId,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with `EnvFilter` and the Sentry layer.
///
/// Defaults to warnings only so command output stays readable. Logs go to
/// stderr, as JSON when `LOG_FORMAT=json`.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocket_shoes_storefront=warn,rs_cli=warn".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let notices = Arc::new(MemoryNotifier::new());
    let state = AppState::new(config, notices.clone())?;

    match cli.command {
        Commands::Show => commands::cart::show(&state),
        Commands::Add { product_id } => commands::cart::add(&state, &notices, product_id).await,
        Commands::Remove { product_id } => {
            commands::cart::remove(&state, &notices, product_id).await;
        }
        Commands::Update { product_id, amount } => {
            commands::cart::update(&state, &notices, product_id, amount).await;
        }
        Commands::Clear => commands::cart::clear(&state)?,
        Commands::Stock { product_id } => commands::catalog::stock(&state, product_id).await?,
        Commands::Product { product_id } => {
            commands::catalog::product(&state, product_id).await?;
        }
    }
    Ok(())
}
