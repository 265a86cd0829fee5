//! Report run orchestration.

use std::path::{Path, PathBuf};

use mpdash_core::Marketplace;

use crate::classify::Classifier;
use crate::combine::{build_marketplace_report, combine, DashboardDocument, ReportContext};
use crate::error::ReportError;
use crate::io::{load_raw_document, write_json};
use crate::normalize::normalize_document;
use crate::types::RawDocument;

/// Input and output locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub wb_input: PathBuf,
    pub ozon_input: PathBuf,
    pub output: PathBuf,
}

impl ReportPaths {
    #[must_use]
    pub fn input_for(&self, marketplace: Marketplace) -> &Path {
        match marketplace {
            Marketplace::Wildberries => &self.wb_input,
            Marketplace::Ozon => &self.ozon_input,
        }
    }
}

/// Builds the dashboard document from already-loaded raw documents.
///
/// `documents` holds whatever marketplaces had data; pure apart from logging.
#[must_use]
pub fn build_document(
    documents: &[RawDocument],
    classifier: &Classifier,
    ctx: &ReportContext,
) -> DashboardDocument {
    let reports = documents
        .iter()
        .map(|document| {
            let marketplace = document.marketplace();
            let data = normalize_document(document);
            tracing::info!(
                %marketplace,
                stocks = data.stocks.len(),
                orders = data.orders.len(),
                redemptions = data.redemptions.len(),
                "normalized marketplace records"
            );
            build_marketplace_report(marketplace, &data, classifier, ctx)
        })
        .collect();

    combine(reports, ctx)
}

/// Run the full report: load both raw documents, build the dashboard, write it.
///
/// 1. Load each marketplace's raw document; missing or malformed files leave
///    that marketplace out.
/// 2. Normalize, roll up, and chart each present marketplace.
/// 3. Combine into one document and write it to `paths.output`.
///
/// # Errors
///
/// Returns [`ReportError`] only if the output cannot be encoded or written.
pub fn run_report(
    paths: &ReportPaths,
    classifier: &Classifier,
    ctx: &ReportContext,
) -> Result<DashboardDocument, ReportError> {
    let documents: Vec<RawDocument> = Marketplace::ALL
        .iter()
        .filter_map(|mp| load_raw_document(paths.input_for(*mp), *mp))
        .collect();

    if documents.is_empty() {
        tracing::warn!("no marketplace data available; writing an empty dashboard");
    }

    let document = build_document(&documents, classifier, ctx);
    write_json(&paths.output, &document)?;

    tracing::info!(
        path = %paths.output.display(),
        total_sales_today = %document.summary.total_sales_today,
        total_stocks = document.summary.total_stocks,
        "dashboard written"
    );

    Ok(document)
}
