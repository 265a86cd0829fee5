//! `prepare` command: one full report run.

use std::path::Path;

use chrono::{Local, NaiveDateTime, NaiveTime};
use mpdash_core::{AppConfig, ClusterTables};
use mpdash_report::{Classifier, ReportContext, ReportPaths, Status};

use crate::PrepareArgs;

/// Builds the classifier from a YAML override, or the built-in tables.
///
/// # Errors
///
/// Returns an error if the override file cannot be read or fails validation.
pub(crate) fn load_classifier(path: Option<&Path>) -> anyhow::Result<Classifier> {
    let tables = match path {
        Some(path) => mpdash_core::load_cluster_tables(path)
            .map_err(|e| anyhow::anyhow!("failed to load cluster tables: {e}"))?,
        None => ClusterTables::builtin(),
    };
    Ok(Classifier::new(tables))
}

/// Merges command-line overrides over the loaded config.
pub(crate) fn resolve_paths(config: &AppConfig, args: &PrepareArgs) -> ReportPaths {
    ReportPaths {
        wb_input: args.wb.clone().unwrap_or_else(|| config.wb_input_path.clone()),
        ozon_input: args
            .ozon
            .clone()
            .unwrap_or_else(|| config.ozon_input_path.clone()),
        output: args.out.clone().unwrap_or_else(|| config.output_path.clone()),
    }
}

/// The run clock: midnight of the fixed report date if one is set, otherwise
/// local wall-clock time.
pub(crate) fn resolve_now(config: &AppConfig, args: &PrepareArgs) -> NaiveDateTime {
    args.date
        .or(config.report_date)
        .map_or_else(|| Local::now().naive_local(), |d| d.and_time(NaiveTime::MIN))
}

/// Run the report once and print a short summary.
///
/// # Errors
///
/// Returns an error if the cluster override is invalid or the dashboard
/// document cannot be written.
pub(crate) fn run_prepare(config: &AppConfig, args: &PrepareArgs) -> anyhow::Result<()> {
    let clusters_path = args.clusters.as_deref().or(config.clusters_path.as_deref());
    let classifier = load_classifier(clusters_path)?;
    let paths = resolve_paths(config, args);
    let ctx = ReportContext {
        now: resolve_now(config, args),
        top_n: config.top_n,
    };

    tracing::info!(
        wb = %paths.wb_input.display(),
        ozon = %paths.ozon_input.display(),
        today = %ctx.now.date(),
        "preparing dashboard data"
    );

    let document = mpdash_report::run_report(&paths, &classifier, &ctx)?;

    for status in &document.marketplaces {
        match status.status {
            Status::Online => tracing::info!(marketplace = status.name, "online"),
            Status::NoData => tracing::warn!(marketplace = status.name, "no data"),
        }
    }

    println!(
        "Total sales (Today): {:.2} RUB",
        document.summary.total_sales_today
    );
    println!("Saved to: {}", paths.output.display());
    Ok(())
}
