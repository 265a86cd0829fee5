//! Normalization from raw marketplace rows to the shared record types in
//! [`mpdash_core`].
//!
//! Nothing here fails. Absent or mistyped fields become [`UNKNOWN`] or zero
//! while the rest of the row is kept, so an order with a bad price still
//! counts in its window. A list element that is not an object at all is
//! replaced by the default row with a warning.

use mpdash_core::{Marketplace, NormalizedRecord, RedemptionRecord, StockRecord, UNKNOWN};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{
    OzonFboStock, OzonFinanceOperation, OzonPosting, OzonRawDocument, OzonWarehouseProducts,
    RawDocument, WbOrder, WbRawDocument, WbSale, WbStock,
};

/// Ozon finance operation type for an order delivered to (bought out by) the customer.
pub const OZON_DELIVERED_OPERATION: &str = "OperationAgentDeliveredToCustomer";

/// Every record one marketplace contributes to a report run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketplaceData {
    pub stocks: Vec<StockRecord>,
    pub orders: Vec<NormalizedRecord>,
    pub redemptions: Vec<RedemptionRecord>,
}

/// Normalizes a whole raw document into [`MarketplaceData`].
#[must_use]
pub fn normalize_document(document: &RawDocument) -> MarketplaceData {
    match document {
        RawDocument::Wildberries(doc) => normalize_wb_document(doc),
        RawDocument::Ozon(doc) => normalize_ozon_document(doc),
    }
}

fn normalize_wb_document(doc: &WbRawDocument) -> MarketplaceData {
    let marketplace = Marketplace::Wildberries;

    let stocks = decode_rows::<WbStock>(&doc.raw_stocks, marketplace, "raw_stocks")
        .iter()
        .map(normalize_wb_stock)
        .collect();

    let orders = decode_rows::<WbOrder>(&doc.raw_orders, marketplace, "raw_orders")
        .iter()
        .enumerate()
        .map(|(idx, order)| normalize_wb_order(order, idx))
        .map(|record| guard_revenue(record, marketplace))
        .collect();

    let redemptions = decode_rows::<WbSale>(&doc.raw_sales, marketplace, "raw_sales")
        .iter()
        .map(normalize_wb_sale)
        .collect();

    MarketplaceData {
        stocks,
        orders,
        redemptions,
    }
}

fn normalize_ozon_document(doc: &OzonRawDocument) -> MarketplaceData {
    let marketplace = Marketplace::Ozon;

    let stocks = if doc.fbo_stocks.is_empty() {
        decode_rows::<OzonWarehouseProducts>(
            &doc.stocks_warehouse_products,
            marketplace,
            "stocks_warehouse_products",
        )
        .iter()
        .flat_map(flatten_ozon_warehouse_products)
        .collect()
    } else {
        decode_rows::<OzonFboStock>(&doc.fbo_stocks, marketplace, "fbo_stocks")
            .iter()
            .map(normalize_ozon_fbo_stock)
            .collect()
    };

    let orders = decode_rows::<OzonPosting>(&doc.raw_orders, marketplace, "raw_orders")
        .iter()
        .enumerate()
        .flat_map(|(idx, posting)| normalize_ozon_posting(posting, idx))
        .map(|record| guard_revenue(record, marketplace))
        .collect();

    let redemptions = decode_rows::<OzonFinanceOperation>(
        &doc.finance_redemptions,
        marketplace,
        "finance_redemptions",
    )
    .iter()
    .filter_map(normalize_ozon_finance_operation)
    .collect();

    MarketplaceData {
        stocks,
        orders,
        redemptions,
    }
}

/// Decodes each element independently; undecodable elements become `T::default()`.
fn decode_rows<T>(rows: &[Value], marketplace: Marketplace, field: &str) -> Vec<T>
where
    T: DeserializeOwned + Default,
{
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            T::deserialize(row).unwrap_or_else(|error| {
                tracing::warn!(
                    %marketplace,
                    field,
                    index = idx,
                    %error,
                    "raw row did not decode; substituting defaults"
                );
                T::default()
            })
        })
        .collect()
}

/// Zeroes the price of a line whose revenue does not fit in a [`Decimal`].
fn guard_revenue(mut record: NormalizedRecord, marketplace: Marketplace) -> NormalizedRecord {
    if record.checked_revenue().is_none() {
        tracing::warn!(
            %marketplace,
            order_id = %record.order_id,
            price = %record.unit_price,
            quantity = record.quantity,
            "line revenue overflows; counting it as zero"
        );
        record.unit_price = Decimal::ZERO;
    }
    record
}

/// Trims a raw text field, treating empty strings as absent.
fn text(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn text_or_unknown(value: Option<&String>) -> String {
    text(value).unwrap_or_else(|| UNKNOWN.to_string())
}

#[must_use]
pub fn normalize_wb_stock(stock: &WbStock) -> StockRecord {
    StockRecord {
        warehouse: text_or_unknown(stock.warehouse_name.as_ref()),
        article: text_or_unknown(stock.supplier_article.as_ref()),
        quantity: stock.quantity_full.unwrap_or(0),
    }
}

/// Normalizes one WB order row. WB reports a row per unit, so `quantity` is 1.
///
/// `index` is the row's position in `raw_orders`, used as the order id when
/// the row carries neither `srid` nor `gNumber`.
#[must_use]
pub fn normalize_wb_order(order: &WbOrder, index: usize) -> NormalizedRecord {
    let order_id = text(order.srid.as_ref())
        .or_else(|| text(order.g_number.as_ref()))
        .unwrap_or_else(|| format!("wb-{index}"));

    NormalizedRecord {
        order_id,
        warehouse: text_or_unknown(order.warehouse_name.as_ref()),
        region_hint: text_or_unknown(order.region_name.as_ref()),
        article: text_or_unknown(order.supplier_article.as_ref()),
        unit_price: order.price_with_disc.unwrap_or(Decimal::ZERO),
        quantity: 1,
        occurred_at: text(order.date.as_ref()).or_else(|| text(order.date_full.as_ref())),
    }
}

#[must_use]
pub fn normalize_wb_sale(sale: &WbSale) -> RedemptionRecord {
    RedemptionRecord {
        amount: sale.for_pay.unwrap_or(Decimal::ZERO),
        occurred_at: text(sale.date.as_ref()).or_else(|| text(sale.date_full.as_ref())),
    }
}

/// Normalizes one Ozon posting into a record per line item.
///
/// Line items come from `products`; when that list is empty the priced
/// entries of `financial_data.products` are used with an unknown article. A
/// posting with no line items at all still yields one zero-priced record so
/// it counts as an order.
#[must_use]
pub fn normalize_ozon_posting(posting: &OzonPosting, index: usize) -> Vec<NormalizedRecord> {
    let order_id = text(posting.posting_number.as_ref())
        .or_else(|| text(posting.order_number.as_ref()))
        .unwrap_or_else(|| format!("ozon-{index}"));

    let analytics = posting.analytics_data.as_ref();
    let financial = posting.financial_data.as_ref();

    let warehouse = text_or_unknown(analytics.and_then(|a| a.warehouse_name.as_ref()));
    let region_hint = text(financial.and_then(|f| f.cluster_to.as_ref()))
        .or_else(|| text(analytics.and_then(|a| a.city.as_ref())))
        .unwrap_or_else(|| UNKNOWN.to_string());
    let occurred_at = text(posting.created_at.as_ref());

    let line = |article: String, price: Option<Decimal>, quantity: Option<u64>| NormalizedRecord {
        order_id: order_id.clone(),
        warehouse: warehouse.clone(),
        region_hint: region_hint.clone(),
        article,
        unit_price: price.unwrap_or(Decimal::ZERO),
        quantity: quantity.unwrap_or(1),
        occurred_at: occurred_at.clone(),
    };

    if !posting.products.is_empty() {
        return posting
            .products
            .iter()
            .map(|p| line(text_or_unknown(p.offer_id.as_ref()), p.price, p.quantity))
            .collect();
    }

    let financial_lines: Vec<NormalizedRecord> = financial
        .map(|f| f.products.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|p| line(UNKNOWN.to_string(), p.price, p.quantity))
        .collect();

    if financial_lines.is_empty() {
        vec![line(UNKNOWN.to_string(), None, None)]
    } else {
        financial_lines
    }
}

#[must_use]
pub fn normalize_ozon_fbo_stock(row: &OzonFboStock) -> StockRecord {
    StockRecord {
        warehouse: text_or_unknown(row.warehouse_name.as_ref()),
        article: text_or_unknown(row.item_code.as_ref()),
        quantity: row.free_to_sell_amount.unwrap_or(0),
    }
}

fn flatten_ozon_warehouse_products(row: &OzonWarehouseProducts) -> Vec<StockRecord> {
    let warehouse = text_or_unknown(row.name.as_ref());
    row.products
        .iter()
        .map(|(article, quantity)| StockRecord {
            warehouse: warehouse.clone(),
            article: article.clone(),
            quantity: *quantity,
        })
        .collect()
}

/// Normalizes an Ozon finance operation into a redemption.
///
/// Amounts are negative when money flows to the seller; the absolute value
/// is the redeemed revenue. Operations of any other type than
/// [`OZON_DELIVERED_OPERATION`] are skipped; an absent type is accepted since
/// the fetch script already filters on it.
#[must_use]
pub fn normalize_ozon_finance_operation(op: &OzonFinanceOperation) -> Option<RedemptionRecord> {
    if let Some(kind) = text(op.operation_type.as_ref()) {
        if kind != OZON_DELIVERED_OPERATION {
            return None;
        }
    }
    Some(RedemptionRecord {
        amount: op.amount.unwrap_or(Decimal::ZERO).abs(),
        occurred_at: text(op.operation_date.as_ref()),
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
