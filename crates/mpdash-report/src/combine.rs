//! Assembly of the final dashboard document from per-marketplace results.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use mpdash_core::Marketplace;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::chart::{build_chart_dataset, ChartDataset};
use crate::classify::Classifier;
use crate::normalize::MarketplaceData;
use crate::period::{PeriodWindow, WINDOWS};
use crate::stocks::{roll_up_stocks, ProductStock, StockOptions, WarehouseBasis, WarehouseStock};
use crate::summary::{summarize_period, PeriodSummary};

/// Maximum warehouses charted for Wildberries. Ozon charts every warehouse.
pub const WB_CHART_LIMIT: usize = 15;

/// `last_update` format, e.g. `10.06.2024 14:05`.
pub const LAST_UPDATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Run-wide settings shared by every marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportContext {
    /// The run clock; its date is "today" for every window.
    pub now: NaiveDateTime,
    pub top_n: usize,
}

/// Stock rollup settings for `marketplace`.
///
/// Wildberries counts every stock row and charts at most [`WB_CHART_LIMIT`]
/// warehouses. Ozon counts only in-stock articles and charts every warehouse.
#[must_use]
pub fn stock_options(marketplace: Marketplace, top_n: usize) -> StockOptions {
    match marketplace {
        Marketplace::Wildberries => StockOptions {
            basis: WarehouseBasis::StockRows,
            top_n,
            chart_limit: Some(WB_CHART_LIMIT),
        },
        Marketplace::Ozon => StockOptions {
            basis: WarehouseBasis::InStockArticles,
            top_n,
            chart_limit: None,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockSnapshot {
    pub by_warehouse: Vec<WarehouseStock>,
    pub by_product: Vec<ProductStock>,
    pub chart_data: Option<ChartDataset>,
    pub all_articles: Vec<String>,
}

/// Everything one marketplace contributes to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceReport {
    pub marketplace: Marketplace,
    pub total_stock: i64,
    pub stocks: StockSnapshot,
    /// One summary per entry of [`WINDOWS`], same order.
    pub periods: Vec<PeriodSummary>,
}

impl MarketplaceReport {
    #[must_use]
    pub fn period(&self, key: &str) -> Option<&PeriodSummary> {
        WINDOWS
            .iter()
            .position(|w| w.key == key)
            .and_then(|idx| self.periods.get(idx))
    }
}

/// Runs stock rollups, charting, and every period window for one marketplace.
#[must_use]
pub fn build_marketplace_report(
    marketplace: Marketplace,
    data: &MarketplaceData,
    classifier: &Classifier,
    ctx: &ReportContext,
) -> MarketplaceReport {
    let rollup = roll_up_stocks(&data.stocks, &stock_options(marketplace, ctx.top_n));
    let chart_data =
        build_chart_dataset(&rollup.matrix, &rollup.all_articles, classifier, marketplace);

    let today = ctx.now.date();
    let periods = WINDOWS
        .iter()
        .map(|window| {
            summarize_period(&data.orders, &data.redemptions, window, today, ctx.top_n)
        })
        .collect();

    MarketplaceReport {
        marketplace,
        total_stock: rollup.total,
        stocks: StockSnapshot {
            by_warehouse: rollup.by_warehouse,
            by_product: rollup.by_product,
            chart_data,
            all_articles: rollup.all_articles,
        },
        periods,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub wb_stocks: i64,
    pub ozon_stocks: i64,
    pub total_stocks: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales_today: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Online,
    #[serde(rename = "No Data")]
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketplaceStatus {
    pub name: &'static str,
    pub status: Status,
}

/// The output document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardDocument {
    pub last_update: String,
    pub summary: Summary,
    pub marketplaces: Vec<MarketplaceStatus>,
    /// Window keys and display labels, in output order.
    pub periods: Vec<PeriodWindow>,
    /// Keyed by marketplace (`wb`, `ozon`); absent marketplaces are omitted.
    pub stocks: IndexMap<String, StockSnapshot>,
    /// Keyed by window, then by marketplace.
    pub period_data: IndexMap<String, IndexMap<String, PeriodSummary>>,
}

/// Merges per-marketplace reports into the dashboard document.
///
/// `reports` holds one entry per marketplace that had data; any marketplace
/// in [`Marketplace::ALL`] without an entry is reported as "No Data" and
/// contributes zero to the summary.
#[must_use]
pub fn combine(mut reports: Vec<MarketplaceReport>, ctx: &ReportContext) -> DashboardDocument {
    let mut summary = Summary::default();
    for report in &reports {
        let stocks = match report.marketplace {
            Marketplace::Wildberries => &mut summary.wb_stocks,
            Marketplace::Ozon => &mut summary.ozon_stocks,
        };
        *stocks = stocks.saturating_add(report.total_stock);
        if let Some(today) = report.periods.first() {
            summary.total_sales_today = summary.total_sales_today.saturating_add(today.revenue);
        }
    }
    summary.total_stocks = summary.wb_stocks.saturating_add(summary.ozon_stocks);

    let marketplaces = Marketplace::ALL
        .iter()
        .map(|mp| MarketplaceStatus {
            name: mp.display_name(),
            status: if reports.iter().any(|r| r.marketplace == *mp) {
                Status::Online
            } else {
                Status::NoData
            },
        })
        .collect();

    reports.sort_by_key(|r| Marketplace::ALL.iter().position(|mp| *mp == r.marketplace));

    let mut period_data: IndexMap<String, IndexMap<String, PeriodSummary>> = WINDOWS
        .iter()
        .map(|window| (window.key.to_owned(), IndexMap::new()))
        .collect();

    let mut stocks = IndexMap::new();
    for report in reports {
        let key = report.marketplace.key();
        for (window, summary) in WINDOWS.iter().zip(report.periods) {
            if let Some(by_marketplace) = period_data.get_mut(window.key) {
                by_marketplace.insert(key.to_owned(), summary);
            }
        }
        stocks.insert(key.to_owned(), report.stocks);
    }

    DashboardDocument {
        last_update: ctx.now.format(LAST_UPDATE_FORMAT).to_string(),
        summary,
        marketplaces,
        periods: WINDOWS.to_vec(),
        stocks,
        period_data,
    }
}
