//! `clusters` command: show how a warehouse name is classified.

use std::path::Path;

use mpdash_core::{AppConfig, Marketplace};

use crate::prepare::load_classifier;

/// Print the cluster `warehouse` falls into for `marketplace`.
///
/// # Errors
///
/// Returns an error if the cluster override file is invalid.
pub(crate) fn run_classify(
    config: &AppConfig,
    marketplace: Marketplace,
    warehouse: &str,
    clusters_path: Option<&Path>,
) -> anyhow::Result<()> {
    let classifier = load_classifier(clusters_path.or(config.clusters_path.as_deref()))?;
    let cluster = classifier.classify(warehouse, marketplace);
    println!("{marketplace}\t{warehouse}\t{cluster}");
    Ok(())
}
