mod clusters;
mod prepare;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use mpdash_core::Marketplace;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mpdash")]
#[command(about = "Marketplace dashboard report builder")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the dashboard document from the raw marketplace exports
    Prepare(PrepareArgs),
    /// Print the cluster a warehouse name is assigned to
    Clusters {
        /// Marketplace whose cluster table to use (wb or ozon)
        marketplace: Marketplace,
        /// Warehouse name as it appears in the marketplace export
        warehouse: String,
        /// YAML cluster tables to use instead of the built-in ones
        #[arg(long)]
        clusters: Option<PathBuf>,
    },
}

/// Per-run overrides; anything left unset falls back to `MPDASH_*` config.
#[derive(Debug, Default, Args)]
struct PrepareArgs {
    /// Wildberries raw document
    #[arg(long)]
    wb: Option<PathBuf>,
    /// Ozon raw document
    #[arg(long)]
    ozon: Option<PathBuf>,
    /// Output path for the dashboard document
    #[arg(long)]
    out: Option<PathBuf>,
    /// Report "today" as YYYY-MM-DD instead of the system clock
    #[arg(long, value_parser = mpdash_core::parse_report_date)]
    date: Option<NaiveDate>,
    /// YAML cluster tables to use instead of the built-in ones
    #[arg(long)]
    clusters: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let config = mpdash_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Prepare(args)) => prepare::run_prepare(&config, &args),
        Some(Commands::Clusters {
            marketplace,
            warehouse,
            clusters,
        }) => clusters::run_classify(&config, marketplace, &warehouse, clusters.as_deref()),
        None => prepare::run_prepare(&config, &PrepareArgs::default()),
    }
}
