//! CLI command implementations.

pub mod config;
pub mod export;
pub mod init;
pub mod price;

use clap::{Args, Subcommand};

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Where to write the config file.
    #[arg(default_value = "shop.toml")]
    pub path: String,

    /// Overwrite an existing file without asking.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,

    /// Get a configuration value by dotted key (e.g. `pages.fallback`).
    Get {
        /// Configuration key.
        key: String,
    },

    /// Validate configuration.
    Validate,
}

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Catalog fixture in Stripe listing format (`{"data": [...]}`).
    #[arg(long)]
    pub catalog: String,

    /// Output directory.
    #[arg(short, long, default_value = "out")]
    pub out: String,

    /// Export only the listing and the configured static product pages.
    #[arg(long)]
    pub static_only: bool,
}

/// Arguments for the price command.
#[derive(Args)]
pub struct PriceArgs {
    /// Amount in minor units (e.g. 7990 for R$ 79,90).
    #[arg(allow_hyphen_values = true)]
    pub amount: i64,

    /// ISO 4217 currency code.
    #[arg(long, default_value = "BRL")]
    pub currency: String,

    /// Display locale.
    #[arg(long, default_value = "pt-BR")]
    pub locale: String,
}
