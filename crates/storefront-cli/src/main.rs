//! storefront - CMS page and anonymous consents client
//!
//! Loads normalized CMS pages from an OCC backend and inspects the anonymous
//! consents snapshot persisted on disk.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storefront_occ::cms::PageType;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::StorefrontConfig;

/// storefront - CMS page and anonymous consents client
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (default: ./storefront.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a CMS page and print it as JSON
    Page {
        /// Page label, product code or category code
        id: String,

        /// Page type (ContentPage, ProductPage, CategoryPage, CatalogPage)
        #[arg(long = "type")]
        page_type: Option<PageType>,

        /// Load through the user-scoped endpoints as this user
        #[arg(long)]
        user: Option<String>,
    },

    /// Persisted anonymous consents
    #[command(subcommand)]
    Consents(ConsentsCommands),
}

#[derive(Subcommand, Debug)]
enum ConsentsCommands {
    /// Print the stored snapshot
    Show,
    /// Mark the consent banner as dismissed
    DismissBanner,
}

fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = StorefrontConfig::load(cli.config.as_deref())?;
    tracing::debug!(base_url = %config.occ.base_url, base_site = %config.occ.base_site, "Loaded config");

    match cli.command {
        Commands::Page {
            id,
            page_type,
            user,
        } => commands::page(&config, id, page_type, user).await,
        Commands::Consents(ConsentsCommands::Show) => commands::show_consents(&config),
        Commands::Consents(ConsentsCommands::DismissBanner) => {
            commands::dismiss_banner(&config).await
        }
    }
}
