//! Point-in-time stock views for one marketplace.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use mpdash_core::StockRecord;
use serde::Serialize;

use crate::color::color_for;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarehouseStock {
    pub name: String,
    pub quantity: i64,
    /// Stock rows, or distinct in-stock articles; see [`WarehouseBasis`].
    pub items_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarehouseQuantity {
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductStock {
    pub article: String,
    pub quantity: i64,
    /// Warehouses holding a positive quantity.
    pub warehouses_count: usize,
    pub color: &'static str,
    pub by_warehouse: Vec<WarehouseQuantity>,
}

/// One warehouse row of the warehouse × product matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseProducts {
    pub name: String,
    pub total: i64,
    pub products: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockRollup {
    pub total: i64,
    pub by_warehouse: Vec<WarehouseStock>,
    pub by_product: Vec<ProductStock>,
    /// Positive-quantity matrix, warehouses by total descending.
    pub matrix: Vec<WarehouseProducts>,
    pub all_articles: Vec<String>,
}

/// How warehouse totals and the stock total are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarehouseBasis {
    /// Every stock row counts; `items_count` is the number of rows.
    StockRows,
    /// Only positive rows count; `items_count` is the number of distinct
    /// articles in stock and empty warehouses are left out.
    InStockArticles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockOptions {
    pub basis: WarehouseBasis,
    /// Warehouses kept in `by_warehouse`.
    pub top_n: usize,
    /// Matrix rows kept for charting; `None` keeps all.
    pub chart_limit: Option<usize>,
}

/// Builds every stock view from one marketplace's stock records.
///
/// `all_articles` is collected before the chart limit is applied.
#[must_use]
pub fn roll_up_stocks(records: &[StockRecord], options: &StockOptions) -> StockRollup {
    let mut warehouses: IndexMap<String, WarehouseStock> = IndexMap::new();
    let mut products: IndexMap<String, (i64, IndexMap<String, i64>)> = IndexMap::new();
    let mut matrix: IndexMap<String, WarehouseProducts> = IndexMap::new();
    let mut all_articles = BTreeSet::new();

    for record in records {
        let wh = warehouses
            .entry(record.warehouse.clone())
            .or_insert_with(|| WarehouseStock {
                name: record.warehouse.clone(),
                quantity: 0,
                items_count: 0,
            });
        wh.quantity = wh.quantity.saturating_add(record.quantity);
        wh.items_count += 1;

        let (product_total, per_warehouse) = products.entry(record.article.clone()).or_default();
        *product_total = product_total.saturating_add(record.quantity);

        if record.quantity <= 0 {
            continue;
        }

        let held = per_warehouse.entry(record.warehouse.clone()).or_insert(0);
        *held = held.saturating_add(record.quantity);

        let row = matrix
            .entry(record.warehouse.clone())
            .or_insert_with(|| WarehouseProducts {
                name: record.warehouse.clone(),
                total: 0,
                products: BTreeMap::new(),
            });
        row.total = row.total.saturating_add(record.quantity);
        let cell = row.products.entry(record.article.clone()).or_insert(0);
        *cell = cell.saturating_add(record.quantity);
        all_articles.insert(record.article.clone());
    }

    let mut matrix: Vec<WarehouseProducts> = matrix.into_values().collect();
    matrix.sort_by(|a, b| b.total.cmp(&a.total));

    let (total, mut by_warehouse) = match options.basis {
        WarehouseBasis::StockRows => (
            records
                .iter()
                .fold(0_i64, |acc, r| acc.saturating_add(r.quantity)),
            warehouses.into_values().collect::<Vec<_>>(),
        ),
        WarehouseBasis::InStockArticles => (
            matrix
                .iter()
                .fold(0_i64, |acc, row| acc.saturating_add(row.total)),
            matrix
                .iter()
                .map(|row| WarehouseStock {
                    name: row.name.clone(),
                    quantity: row.total,
                    items_count: row.products.len(),
                })
                .collect(),
        ),
    };
    by_warehouse.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    by_warehouse.truncate(options.top_n);

    let mut by_product: Vec<ProductStock> = products
        .into_iter()
        .map(|(article, (quantity, per_warehouse))| {
            let mut by_warehouse: Vec<WarehouseQuantity> = per_warehouse
                .into_iter()
                .map(|(name, quantity)| WarehouseQuantity { name, quantity })
                .collect();
            by_warehouse.sort_by(|a, b| b.quantity.cmp(&a.quantity));
            ProductStock {
                color: color_for(&article),
                article,
                quantity,
                warehouses_count: by_warehouse.len(),
                by_warehouse,
            }
        })
        .collect();
    by_product.sort_by(|a, b| b.quantity.cmp(&a.quantity));

    if let Some(limit) = options.chart_limit {
        matrix.truncate(limit);
    }

    StockRollup {
        total,
        by_warehouse,
        by_product,
        matrix,
        all_articles: all_articles.into_iter().collect(),
    }
}
