use std::collections::HashSet;

use chrono::NaiveDate;
use mpdash_core::{NormalizedRecord, RedemptionRecord};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{aggregate, Aggregation, Dimension};
use crate::period::{filter, PeriodWindow};

/// One marketplace's sales figures for one reporting window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    /// Total order revenue in the window, before any bucket truncation.
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    /// Distinct order ids in the window.
    pub orders_count: usize,
    pub sales_by_warehouse: Aggregation,
    pub sales_by_region: Aggregation,
    pub sales_by_product: Aggregation,
    #[serde(with = "rust_decimal::serde::float")]
    pub redemptions_revenue: Decimal,
    pub redemptions_count: usize,
}

/// Builds the [`PeriodSummary`] of `window` for one marketplace.
///
/// Orders and redemptions are filtered independently, each by its own
/// timestamp. Warehouse and region aggregations keep the top `top_n` buckets.
#[must_use]
pub fn summarize_period(
    orders: &[NormalizedRecord],
    redemptions: &[RedemptionRecord],
    window: &PeriodWindow,
    today: NaiveDate,
    top_n: usize,
) -> PeriodSummary {
    let in_window = filter(orders, window, today);
    let redeemed = filter(redemptions, window, today);

    let rollup = |primary: Dimension, secondary: Dimension| {
        let agg = aggregate(in_window.iter().copied(), primary, secondary);
        if primary.is_truncated() {
            agg.top(top_n)
        } else {
            agg
        }
    };

    let orders_count = in_window
        .iter()
        .map(|r| r.order_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    PeriodSummary {
        revenue: in_window
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.revenue())),
        orders_count,
        sales_by_warehouse: rollup(Dimension::Warehouse, Dimension::Product),
        sales_by_region: rollup(Dimension::Region, Dimension::Product),
        sales_by_product: rollup(Dimension::Product, Dimension::Warehouse),
        redemptions_revenue: redeemed
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.amount)),
        redemptions_count: redeemed.len(),
    }
}
