//! Raw marketplace document types, as written by the fetch scripts.
//!
//! ## Wildberries (`wb_raw_data.json`)
//!
//! The statistics API returns flat camelCase rows. `raw_orders` has one row
//! per unit ordered (there is no quantity field); `priceWithDisc` is the price
//! after the seller discount and is occasionally `null`. `date` is a naive
//! local timestamp such as `"2024-06-10T14:03:11"`; `dateFull` is only
//! present on some exports. `raw_sales` rows are buy-outs with `forPay`,
//! the amount transferred to the seller, which is negative for returns.
//!
//! ## Ozon (`ozon_raw_data.json`)
//!
//! FBO postings nest their line items in `products`, each with `offer_id`,
//! `price` as a decimal **string** (`"1290.0000"`), and an integer `quantity`.
//! `analytics_data` and `financial_data` are objects or `null` depending on
//! the `with` flags of the request. `finance_redemptions` rows carry a
//! negative `amount` for money flowing to the seller.
//!
//! Every list element is kept as a [`serde_json::Value`] at the document level
//! and decoded one at a time during normalization, so one malformed element
//! cannot take down the whole marketplace. Within an element, a field of the
//! wrong type (`"priceWithDisc": "n/a"`) decodes as absent with a warning and
//! the rest of the row is kept.

use std::collections::BTreeMap;

use mpdash_core::Marketplace;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level Wildberries document. Unknown keys (pre-aggregated views the
/// fetch script also writes) are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct WbRawDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_stocks: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_orders: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_sales: Vec<Value>,
}

/// Top-level Ozon document.
#[derive(Debug, Default, Deserialize)]
pub struct OzonRawDocument {
    /// Rows from `v2/analytics/stock_on_warehouses`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub fbo_stocks: Vec<Value>,
    /// Pre-aggregated warehouse × product matrix; used when `fbo_stocks` is empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub stocks_warehouse_products: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_orders: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub finance_redemptions: Vec<Value>,
}

/// A raw document tagged with the marketplace it came from.
#[derive(Debug)]
pub enum RawDocument {
    Wildberries(WbRawDocument),
    Ozon(OzonRawDocument),
}

impl RawDocument {
    #[must_use]
    pub fn marketplace(&self) -> Marketplace {
        match self {
            RawDocument::Wildberries(_) => Marketplace::Wildberries,
            RawDocument::Ozon(_) => Marketplace::Ozon,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WbStock {
    #[serde(default, deserialize_with = "lenient")]
    pub warehouse_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub supplier_article: Option<String>,
    /// Units on hand including those in transit to the customer.
    #[serde(default, deserialize_with = "lenient_whole")]
    pub quantity_full: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WbOrder {
    /// Unique order-row id.
    #[serde(default, deserialize_with = "lenient")]
    pub srid: Option<String>,
    /// Cart id shared by rows bought together.
    #[serde(default, deserialize_with = "lenient")]
    pub g_number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub warehouse_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub region_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub supplier_article: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_with_disc: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub date_full: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WbSale {
    #[serde(default, deserialize_with = "lenient")]
    pub for_pay: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub date_full: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OzonPosting {
    #[serde(default, deserialize_with = "lenient")]
    pub posting_number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub order_number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<OzonProduct>,
    #[serde(default, deserialize_with = "lenient")]
    pub analytics_data: Option<OzonAnalyticsData>,
    #[serde(default, deserialize_with = "lenient")]
    pub financial_data: Option<OzonFinancialData>,
}

/// A line item inside an [`OzonPosting`].
#[derive(Debug, Default, Deserialize)]
pub struct OzonProduct {
    #[serde(default, deserialize_with = "lenient")]
    pub offer_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_whole")]
    pub quantity: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OzonAnalyticsData {
    #[serde(default, deserialize_with = "lenient")]
    pub warehouse_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub city: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OzonFinancialData {
    /// Delivery cluster, e.g. `"Москва, МО и Дальние регионы"`.
    #[serde(default, deserialize_with = "lenient")]
    pub cluster_to: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: Vec<OzonFinancialProduct>,
}

/// Financial view of a line item; carries price but no `offer_id`.
#[derive(Debug, Default, Deserialize)]
pub struct OzonFinancialProduct {
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_whole")]
    pub quantity: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OzonFboStock {
    #[serde(default, deserialize_with = "lenient")]
    pub warehouse_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub item_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_whole")]
    pub free_to_sell_amount: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OzonWarehouseProducts {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub products: BTreeMap<String, i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OzonFinanceOperation {
    #[serde(default, deserialize_with = "lenient")]
    pub operation_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub operation_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub amount: Option<Decimal>,
}

/// Treats an explicit JSON `null` the same as a missing field.
///
/// `#[serde(default)]` alone only covers absence; Ozon sends `"products": null`
/// on cancelled postings.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decodes an optional field, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match T::deserialize(&value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(error) => {
            tracing::warn!(%value, %error, "ignoring malformed field value");
            Ok(None)
        }
    }
}

/// Decodes an optional whole-number field from an integer, a float with no
/// fractional part (`2.0`), or a numeric string (`"2"`).
fn lenient_whole<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i128>,
{
    let number: Option<Decimal> = lenient(deserializer)?;
    let Some(number) = number else {
        return Ok(None);
    };
    let whole = if number.fract().is_zero() {
        number.to_i128().and_then(|n| T::try_from(n).ok())
    } else {
        None
    };
    if whole.is_none() {
        tracing::warn!(%number, "ignoring count that is not a whole number in range");
    }
    Ok(whole)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wb_document_ignores_unknown_keys_and_nulls() {
        let doc: WbRawDocument = serde_json::from_value(json!({
            "marketplace": "Wildberries",
            "raw_stocks": null,
            "raw_orders": [{"srid": "a"}],
        }))
        .unwrap();
        assert!(doc.raw_stocks.is_empty());
        assert_eq!(doc.raw_orders.len(), 1);
        assert!(doc.raw_sales.is_empty());
    }

    #[test]
    fn wb_order_reads_camel_case_fields() {
        let order: WbOrder = serde_json::from_value(json!({
            "srid": "11.rb",
            "gNumber": "777",
            "warehouseName": "Коледино",
            "regionName": "Московская",
            "supplierArticle": "SF0125",
            "priceWithDisc": 1234.56,
            "date": "2024-06-10T10:00:00"
        }))
        .unwrap();
        assert_eq!(order.g_number.as_deref(), Some("777"));
        assert_eq!(order.price_with_disc, Some(Decimal::new(123_456, 2)));
        assert_eq!(order.warehouse_name.as_deref(), Some("Коледино"));
    }

    #[test]
    fn wb_order_null_price_is_none() {
        let order: WbOrder = serde_json::from_value(json!({"priceWithDisc": null})).unwrap();
        assert!(order.price_with_disc.is_none());
    }

    #[test]
    fn ozon_product_price_accepts_decimal_string() {
        let product: OzonProduct = serde_json::from_value(json!({
            "offer_id": "SF0250",
            "price": "1290.5000",
            "quantity": 2
        }))
        .unwrap();
        assert_eq!(product.price, Some(Decimal::new(12_905, 1)));
        assert_eq!(product.quantity, Some(2));
    }

    #[test]
    fn ozon_posting_null_nested_objects() {
        let posting: OzonPosting = serde_json::from_value(json!({
            "posting_number": "0001-1",
            "products": null,
            "analytics_data": null,
            "financial_data": null
        }))
        .unwrap();
        assert!(posting.products.is_empty());
        assert!(posting.analytics_data.is_none());
        assert!(posting.financial_data.is_none());
    }

    #[test]
    fn ozon_warehouse_products_map() {
        let row: OzonWarehouseProducts = serde_json::from_value(json!({
            "name": "Хоругвино",
            "total": 7,
            "products": {"SF0125": 3, "SM0250": 4}
        }))
        .unwrap();
        assert_eq!(row.products.get("SM0250"), Some(&4));
    }

    #[test]
    fn mistyped_field_keeps_rest_of_row() {
        let order: WbOrder = serde_json::from_value(json!({
            "srid": "a",
            "warehouseName": "Коледино",
            "priceWithDisc": "n/a",
            "date": "2024-06-10T09:00:00"
        }))
        .unwrap();
        assert!(order.price_with_disc.is_none());
        assert_eq!(order.srid.as_deref(), Some("a"));
        assert_eq!(order.warehouse_name.as_deref(), Some("Коледино"));
        assert_eq!(order.date.as_deref(), Some("2024-06-10T09:00:00"));

        let order: WbOrder =
            serde_json::from_value(json!({"warehouseName": 17, "srid": "b"})).unwrap();
        assert!(order.warehouse_name.is_none());
        assert_eq!(order.srid.as_deref(), Some("b"));
    }

    #[test]
    fn whole_number_counts_accept_floats_and_strings() {
        let product: OzonProduct = serde_json::from_value(json!({"quantity": 2.0})).unwrap();
        assert_eq!(product.quantity, Some(2));
        let product: OzonProduct = serde_json::from_value(json!({"quantity": "3"})).unwrap();
        assert_eq!(product.quantity, Some(3));
        let product: OzonProduct = serde_json::from_value(json!({"quantity": 1.5})).unwrap();
        assert!(product.quantity.is_none());
        let product: OzonProduct = serde_json::from_value(json!({"quantity": -1})).unwrap();
        assert!(product.quantity.is_none());

        let stock: WbStock = serde_json::from_value(json!({"quantityFull": -4})).unwrap();
        assert_eq!(stock.quantity_full, Some(-4));
        let stock: OzonFboStock =
            serde_json::from_value(json!({"free_to_sell_amount": "lots"})).unwrap();
        assert!(stock.free_to_sell_amount.is_none());
    }

    #[test]
    fn large_quantities_still_decode() {
        let product: OzonProduct = serde_json::from_value(json!({
            "price": "10000000000",
            "quantity": 10_000_000_000_000_000_000_u64
        }))
        .unwrap();
        assert_eq!(product.quantity, Some(10_000_000_000_000_000_000));
    }
}
