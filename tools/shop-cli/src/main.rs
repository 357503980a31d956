//! Shop CLI - Command line tool for the storefront.
//!
//! Commands:
//! - `shop init` - Write a default `shop.toml`
//! - `shop config` - Show, query and validate configuration
//! - `shop export` - Render the site from a catalog fixture to static HTML
//! - `shop price` - Format an amount the way pages do

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ConfigArgs, ExportArgs, InitArgs, PriceArgs};

/// Shop CLI - Configure and export the storefront
#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default shop.toml
    Init(InitArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Render the site from a catalog fixture
    Export(ExportArgs),

    /// Format a price
    Price(PriceArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
        Commands::Export(args) => commands::export::run(args, &ctx).await,
        Commands::Price(args) => commands::price::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
